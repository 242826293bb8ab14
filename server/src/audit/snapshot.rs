//! リクエストスナップショットの取得
//!
//! ボディを読み切って長さを記録し、同じバイト列で作り直したボディを
//! リクエストに戻す。ラップされたハンドラーは先頭から読み直せる。

use crate::audit::types::RequestSnapshot;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Request},
};
use http_body::Body as _;
use std::collections::BTreeMap;
use tracing::debug;

/// 複数値ヘッダーの連結区切り
const HEADER_VALUE_SEPARATOR: &str = ", ";

/// リクエストからスナップショットを取得し、ボディを復元したリクエストを返す
///
/// ボディの読み取りに失敗した場合は長さ0として扱い、ハンドラーには空ボディを渡す。
pub async fn capture_request(request: Request<Body>) -> (RequestSnapshot, Request<Body>) {
    let url = request.uri().to_string();
    let query = request.uri().query().unwrap_or_default().to_string();
    let headers = flatten_headers(request.headers());

    let (parts, body) = request.into_parts();

    // ボディなし: 差し替え不要
    if body.is_end_stream() {
        let snapshot = RequestSnapshot {
            url,
            query,
            headers,
            body_length: 0,
        };
        return (snapshot, Request::from_parts(parts, body));
    }

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(url = %url, "Failed to read request body, treating as empty: {}", e);
            Bytes::new()
        }
    };

    let snapshot = RequestSnapshot {
        url,
        query,
        headers,
        body_length: bytes.len(),
    };

    (snapshot, Request::from_parts(parts, Body::from(bytes)))
}

/// ヘッダーを「名前 → 連結済み値」のマップに平坦化する
///
/// `Host` はリクエストターゲットの一部として扱い、ヘッダーには含めない。
pub fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .filter(|name| **name != header::HOST)
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(HEADER_VALUE_SEPARATOR);
            (canonical_header_name(name.as_str()), joined)
        })
        .collect()
}

/// ヘッダー名を正規形に変換する（`x-trace` → `X-Trace`）
pub fn canonical_header_name(name: &str) -> String {
    let mut upper_next = true;
    name.chars()
        .map(|c| {
            let converted = if upper_next {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper_next = c == '-';
            converted
        })
        .collect()
}
