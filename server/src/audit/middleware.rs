//! 監査ログデコレーター
//!
//! ハンドラーをメモリ上のキャプチャシンクに対して実行し、結果をそのまま
//! クライアントへ中継したうえで監査レコードを書き出す。
//! ハンドラーの外部から見える振る舞いは変えない。

use crate::audit::sink::{CaptureSink, LiveResponse, ResponseSink};
use crate::audit::snapshot::capture_request;
use crate::audit::types::{AuditRecord, ResponseSummary};
use crate::audit::writer::LogPersister;
use async_trait::async_trait;
use audit_relay_common::auth::Claims;
use axum::{body::Body, http::Request, response::Response};
use tracing::trace;

/// 監査対象のハンドラー
///
/// レスポンスは `sink` に書き込む。`claims` はリクエストごとにゼロ値で渡され、
/// 埋めるかどうかはハンドラー次第。
#[async_trait]
pub trait AuditedHandler: Send + Sync + 'static {
    /// リクエストを処理する
    async fn call(
        &self,
        sink: &mut dyn ResponseSink,
        request: Request<Body>,
        claims: &mut Claims,
    );
}

/// ハンドラーを監査付きで実行する
///
/// 1. リクエストのスナップショットを取得（ボディは復元して渡す）
/// 2. キャプチャシンクに対してハンドラーを実行
/// 3. ヘッダー → ステータス → ボディの順で実レスポンスへ中継
/// 4. 監査レコードを書き出す（失敗してもレスポンスは変わらない）
///
/// ハンドラーがpanicした場合は捕捉しない。
pub async fn serve_audited(
    handler: &dyn AuditedHandler,
    persister: &LogPersister,
    request: Request<Body>,
) -> Response {
    let (snapshot, request) = capture_request(request).await;

    let mut capture = CaptureSink::new();
    let mut claims = Claims::default();
    handler.call(&mut capture, request, &mut claims).await;
    let captured = capture.finish();

    let mut live = LiveResponse::new();
    captured.relay_to(&mut live);
    let mut response = live.into_response();
    // ハンドラーが確立した認証情報は外側のレイヤーから参照できるようにする
    response.extensions_mut().insert(claims);

    let summary = ResponseSummary::new(captured.status, captured.body.len());
    trace!(
        url = %snapshot.url,
        req_body_len = snapshot.body_length,
        status = captured.status.as_u16(),
        rsp_body_len = summary.body_length,
        "audit record captured"
    );

    persister.persist(&AuditRecord::new(snapshot, summary)).await;

    response
}
