//! E2E Test: 実際のTCP接続越しに中継されるレスポンスの検証

use crate::support::{account_app, app_config, log_files, read_log, spawn_server};
use async_trait::async_trait;
use audit_relay::audit::middleware::AuditedHandler;
use audit_relay::audit::sink::ResponseSink;
use audit_relay::routes::RouteTable;
use audit_relay::server::create_app;
use audit_relay_common::auth::Claims;
use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request, StatusCode},
};

/// 複数チャンク・複数値ヘッダーを書くハンドラー
struct ChunkedHandler;

#[async_trait]
impl AuditedHandler for ChunkedHandler {
    async fn call(
        &self,
        sink: &mut dyn ResponseSink,
        request: Request<Body>,
        _claims: &mut Claims,
    ) {
        let body = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        sink.set_header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        sink.append_header(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        sink.append_header(header::SET_COOKIE, HeaderValue::from_static("b=2"));
        sink.set_header(
            HeaderName::from_static("x-request-bytes"),
            HeaderValue::from(body.len()),
        );
        sink.set_status(StatusCode::ACCEPTED);
        sink.write_body(b"received:");
        sink.write_body(&body);
    }
}

#[tokio::test]
async fn test_response_is_relayed_byte_for_byte() {
    let temp = tempfile::tempdir().unwrap();
    let config = app_config(
        temp.path(),
        false,
        RouteTable::new().route("/echo", ChunkedHandler),
    );
    let (addr, handle) = spawn_server(create_app(&config)).await;

    let payload = "x".repeat(64 * 1024);
    let res = reqwest::Client::new()
        .post(format!("http://{}/echo?mode=raw", addr))
        .header("X-Trace", "abc")
        .body(payload.clone())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 202);
    assert_eq!(res.headers()["content-type"], "text/plain");
    assert_eq!(res.headers()["x-request-bytes"], payload.len().to_string());
    let cookies: Vec<_> = res.headers().get_all("set-cookie").iter().collect();
    assert_eq!(cookies, vec!["a=1", "b=2"]);
    let body = res.text().await.unwrap();
    assert_eq!(body, format!("received:{}", payload));

    let files = log_files(temp.path());
    assert_eq!(files.len(), 1);
    let log = read_log(&files[0]);
    assert_eq!(log["req"]["url"], "/echo?mode=raw");
    assert_eq!(log["req"]["qs_params"], "mode=raw");
    assert_eq!(log["req"]["headers"]["X-Trace"], "abc");
    assert_eq!(log["req"]["req_body_len"], payload.len());
    assert_eq!(log["rsp"]["status_class"], "2xx");
    assert_eq!(log["rsp"]["rsp_body_len"], body.len());

    handle.abort();
}

/// 実接続のスナップショットには Host ヘッダーを含めない
#[tokio::test]
async fn test_snapshot_over_real_connection_omits_host() {
    let temp = tempfile::tempdir().unwrap();
    let (app, _store) = account_app(temp.path(), false);
    let (addr, handle) = spawn_server(app).await;

    let res = reqwest::Client::new()
        .get(format!("http://{}/balance?user=42", addr))
        .header("X-Trace", "a")
        .header("X-Trace", "b")
        .send()
        .await
        .unwrap();
    let status = res.status().as_u16();
    let body = res.bytes().await.unwrap();

    let files = log_files(temp.path());
    assert_eq!(files.len(), 1);
    let log = read_log(&files[0]);
    let headers = log["req"]["headers"].as_object().unwrap();
    assert!(
        !headers.contains_key("Host"),
        "Host must not be logged: {:?}",
        headers
    );
    assert_eq!(headers["X-Trace"], "a, b");
    assert_eq!(log["req"]["url"], "/balance?user=42");
    assert_eq!(log["req"]["qs_params"], "user=42");
    assert_eq!(log["req"]["req_body_len"], 0);
    assert_eq!(log["rsp"]["status_class"], format!("{}xx", status / 100));
    assert_eq!(log["rsp"]["rsp_body_len"], body.len());

    handle.abort();
}
