//! レスポンスシンク
//!
//! ハンドラーが書き込む先の抽象。メモリ上のキャプチャ（`CaptureSink`）と
//! 実際の送信先（`LiveResponse`）の両方がこのトレイトを実装するため、
//! ハンドラーはどちらに書いているかを意識しない。

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use futures::stream;
use std::convert::Infallible;
use tracing::warn;

/// レスポンス書き込み先
pub trait ResponseSink: Send {
    /// ヘッダーを設定する（同名の既存値は上書き）
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// ヘッダー値を追加する（同名の既存値は保持）
    fn append_header(&mut self, name: HeaderName, value: HeaderValue);

    /// ステータスコードを設定する（最初の1回のみ有効）
    fn set_status(&mut self, status: StatusCode);

    /// ボディにバイト列を追記する
    fn write_body(&mut self, chunk: &[u8]);
}

/// ステータス設定を受け付けるか判定する
///
/// 二重設定と600以上のコードは無視する（ステータスクラスは1xx〜5xxに限る）。
fn accept_status(current: Option<StatusCode>, status: StatusCode) -> bool {
    if let Some(current) = current {
        warn!(
            current = current.as_u16(),
            ignored = status.as_u16(),
            "superfluous status write ignored"
        );
        return false;
    }
    if status.as_u16() >= 600 {
        warn!(status = status.as_u16(), "status code out of range ignored");
        return false;
    }
    true
}

/// メモリ上にレスポンスを記録するシンク
#[derive(Debug, Default)]
pub struct CaptureSink {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl CaptureSink {
    /// 空のキャプチャシンクを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録内容を確定する（ステータス未設定なら200）
    pub fn finish(self) -> CapturedResponse {
        CapturedResponse {
            status: self.status.unwrap_or(StatusCode::OK),
            headers: self.headers,
            body: Bytes::from(self.body),
        }
    }
}

impl ResponseSink for CaptureSink {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn append_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    fn set_status(&mut self, status: StatusCode) {
        if accept_status(self.status, status) {
            self.status = Some(status);
        }
    }

    fn write_body(&mut self, chunk: &[u8]) {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(chunk);
    }
}

/// キャプチャ済みのレスポンス
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    /// ステータスコード
    pub status: StatusCode,
    /// ヘッダー
    pub headers: HeaderMap,
    /// ボディ
    pub body: Bytes,
}

impl CapturedResponse {
    /// 実際の送信先へ中継する
    ///
    /// 順序はヘッダー → ステータス → ボディ。同名ヘッダーの複数値もすべて中継する。
    pub fn relay_to(&self, sink: &mut dyn ResponseSink) {
        for (name, value) in self.headers.iter() {
            sink.append_header(name.clone(), value.clone());
        }
        sink.set_status(self.status);
        if !self.body.is_empty() {
            sink.write_body(&self.body);
        }
    }
}

/// 実際のクライアントへ返すレスポンス
///
/// ボディの書き込みが始まった時点でヘッダーとステータスは確定し、
/// 以降の変更は無視される。
#[derive(Debug, Default)]
pub struct LiveResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    chunks: Vec<Bytes>,
    committed: bool,
}

impl LiveResponse {
    /// 空のレスポンスを作成
    pub fn new() -> Self {
        Self::default()
    }

    fn reject_after_commit(&self, name: &HeaderName) -> bool {
        if self.committed {
            warn!(header = %name, "header write after body start ignored");
        }
        self.committed
    }

    /// axumのレスポンスに変換する（書き込まれたチャンク順にボディを送出）
    pub fn into_response(mut self) -> Response {
        let body = if self.chunks.len() <= 1 {
            Body::from(self.chunks.pop().unwrap_or_default())
        } else {
            Body::from_stream(stream::iter(self.chunks.into_iter().map(Ok::<_, Infallible>)))
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for LiveResponse {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if !self.reject_after_commit(&name) {
            self.headers.insert(name, value);
        }
    }

    fn append_header(&mut self, name: HeaderName, value: HeaderValue) {
        if !self.reject_after_commit(&name) {
            self.headers.append(name, value);
        }
    }

    fn set_status(&mut self, status: StatusCode) {
        if accept_status(self.status, status) {
            self.status = Some(status);
        }
    }

    fn write_body(&mut self, chunk: &[u8]) {
        self.status.get_or_insert(StatusCode::OK);
        self.committed = true;
        self.chunks.push(Bytes::copy_from_slice(chunk));
    }
}
