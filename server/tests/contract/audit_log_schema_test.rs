//! Contract Test: 監査ログファイルの形式
//!
//! `log - <YYYY-MM-DD_HH-MM-SS>.json`、タブインデント、req/rspスキーマ

use crate::support::{account_app, log_files, read_log};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use chrono::{Local, Timelike};
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;

fn balance_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/balance?user=42")
        .header("X-Trace", "a, b")
        .body(Body::empty())
        .unwrap()
}

/// 次の秒の先頭まで待つ（同一秒内に収めたいテスト用）
async fn wait_for_second_boundary() {
    let now = Local::now();
    let remaining_nanos = 1_000_000_000u64 - u64::from(now.nanosecond() % 1_000_000_000);
    tokio::time::sleep(Duration::from_nanos(remaining_nanos + 1_000_000)).await;
}

/// GET /balance?user=42（ボディなし、X-Trace: a, b）
#[tokio::test]
async fn test_balance_snapshot_matches_schema() {
    let temp = tempfile::tempdir().unwrap();
    let (app, _store) = account_app(temp.path(), false);

    let res = app.oneshot(balance_request()).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();

    let files = log_files(temp.path());
    assert_eq!(files.len(), 1);

    let name = files[0].file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("log - "), "unexpected file name: {}", name);
    assert!(name.ends_with(".json"), "unexpected file name: {}", name);
    let timestamp = &name["log - ".len()..name.len() - ".json".len()];
    assert!(
        chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d_%H-%M-%S").is_ok(),
        "timestamp should be second-granular: {}",
        timestamp
    );

    let raw = std::fs::read_to_string(&files[0]).unwrap();
    assert!(raw.starts_with("{\n\t\"req\": {\n"), "tab-indented JSON expected");

    let log = read_log(&files[0]);
    assert_eq!(
        log,
        json!({
            "req": {
                "url": "/balance?user=42",
                "qs_params": "user=42",
                "headers": {"X-Trace": "a, b"},
                "req_body_len": 0
            },
            "rsp": {
                "status_class": "4xx",
                "rsp_body_len": body.len()
            }
        })
    );
}

/// 同一秒内の2リクエストはファイル名が衝突し、1ファイルだけ残る
#[tokio::test]
async fn test_same_second_requests_leave_single_file() {
    let temp = tempfile::tempdir().unwrap();
    let (app, _store) = account_app(temp.path(), false);

    wait_for_second_boundary().await;
    let first = app.clone().oneshot(balance_request()).await.unwrap();
    let second = app.oneshot(balance_request()).await.unwrap();

    assert_eq!(first.status(), StatusCode::NOT_FOUND);
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    assert_eq!(log_files(temp.path()).len(), 1);
}

#[tokio::test]
async fn test_unique_filenames_keep_every_record() {
    let temp = tempfile::tempdir().unwrap();
    let (app, _store) = account_app(temp.path(), true);

    wait_for_second_boundary().await;
    app.clone().oneshot(balance_request()).await.unwrap();
    app.oneshot(balance_request()).await.unwrap();

    assert_eq!(log_files(temp.path()).len(), 2);
}

/// ログディレクトリに書き込めなくてもレスポンスは変わらない
#[tokio::test]
async fn test_unwritable_log_directory_keeps_response() {
    let temp = tempfile::tempdir().unwrap();
    let writable = temp.path().join("ok");
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let unwritable = blocker.join("logs");

    let (ok_app, _) = account_app(&writable, false);
    let (broken_app, _) = account_app(&unwritable, false);

    let expected = ok_app.oneshot(balance_request()).await.unwrap();
    let actual = broken_app.oneshot(balance_request()).await.unwrap();

    assert_eq!(actual.status(), expected.status());
    assert_eq!(
        actual.headers().get("content-type"),
        expected.headers().get("content-type")
    );
    let expected_body = to_bytes(expected.into_body(), usize::MAX).await.unwrap();
    let actual_body = to_bytes(actual.into_body(), usize::MAX).await.unwrap();
    assert_eq!(actual_body, expected_body);

    assert_eq!(log_files(&writable).len(), 1);
    assert!(!unwritable.exists());
}
