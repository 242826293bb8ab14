//! REST APIハンドラー
//!
//! アカウント登録・ログイン・一覧・残高照会。各ハンドラーは監査デコレーター経由で
//! 公開され、レスポンスは `ResponseSink` に書き込む。

/// アカウントAPI
pub mod accounts;

use crate::audit::sink::ResponseSink;
use crate::routes::RouteTable;
use accounts::{AccountStore, AccountsHandler, BalanceHandler, LoginHandler, RegisterHandler};
use axum::http::{header, HeaderValue, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// 標準のルートテーブルを作成
pub fn default_routes(store: Arc<AccountStore>) -> RouteTable {
    RouteTable::new()
        .route("/register", RegisterHandler::new(store.clone()))
        .route("/login", LoginHandler::new(store.clone()))
        .route("/accounts", AccountsHandler::new(store.clone()))
        .route("/balance", BalanceHandler::new(store))
}

/// アカウントAPIのエラー
#[derive(Debug, Error)]
pub enum AccountError {
    /// 不正なリクエスト
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 許可されていないメソッド
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// 認証失敗
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// ユーザー名の重複
    #[error("Account already exists: {0}")]
    AlreadyExists(String),

    /// 存在しないアカウント
    #[error("Account not found: {0}")]
    NotFound(String),
}

impl AccountError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AlreadyExists(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// JSONレスポンスを書き込む
pub fn write_json<T: Serialize>(sink: &mut dyn ResponseSink, status: StatusCode, body: &T) {
    let bytes = match serde_json::to_vec(body) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            sink.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };
    sink.set_header(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    sink.set_status(status);
    sink.write_body(&bytes);
}

/// エラーレスポンスを書き込む
pub fn write_error(sink: &mut dyn ResponseSink, err: &AccountError) {
    write_json(
        sink,
        err.status_code(),
        &ErrorBody {
            error: err.to_string(),
        },
    );
}
