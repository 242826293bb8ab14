//! 監査レコードの型定義
//!
//! 1リクエストにつき1件生成され、永続化後に破棄される。
//! フィールド順はログファイルのJSONキー順にそのまま反映される。

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// リクエストのスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSnapshot {
    /// リクエストターゲット（パス＋クエリ）
    pub url: String,
    /// 生のクエリ文字列
    #[serde(rename = "qs_params")]
    pub query: String,
    /// ヘッダー（複数値は ", " で連結）
    pub headers: BTreeMap<String, String>,
    /// リクエストボディのバイト数
    #[serde(rename = "req_body_len")]
    pub body_length: usize,
}

/// レスポンスの要約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSummary {
    /// ステータスクラス（"1xx".."5xx"）
    pub status_class: String,
    /// レスポンスボディのバイト数
    #[serde(rename = "rsp_body_len")]
    pub body_length: usize,
}

impl ResponseSummary {
    /// キャプチャしたステータスとボディ長から要約を作成
    pub fn new(status: StatusCode, body_length: usize) -> Self {
        Self {
            status_class: status_class(status),
            body_length,
        }
    }
}

/// 監査レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// リクエスト側
    pub req: RequestSnapshot,
    /// レスポンス側
    pub rsp: ResponseSummary,
}

impl AuditRecord {
    /// スナップショットと要約から監査レコードを組み立てる
    pub fn new(req: RequestSnapshot, rsp: ResponseSummary) -> Self {
        Self { req, rsp }
    }
}

/// ステータスコードを100で割ったクラス表記に変換（404 → "4xx"）
pub fn status_class(status: StatusCode) -> String {
    format!("{}xx", status.as_u16() / 100)
}
