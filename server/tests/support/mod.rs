//! テスト共通ユーティリティ

use audit_relay::api;
use audit_relay::api::accounts::AccountStore;
use audit_relay::config::AppConfig;
use audit_relay::routes::RouteTable;
use audit_relay::server::create_app;
use audit_relay_common::config::ServerConfig;
use axum::Router;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{net::TcpListener, task::JoinHandle};

/// ログディレクトリを指定してAppConfigを作成
#[allow(dead_code)]
pub fn app_config(log_directory: &Path, unique: bool, route_table: RouteTable) -> AppConfig {
    let server = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        log_directory: log_directory.to_path_buf(),
        unique_log_filenames: unique,
    };
    AppConfig::new(&server, route_table)
}

/// アカウントAPI付きのRouterを作成
#[allow(dead_code)]
pub fn account_app(log_directory: &Path, unique: bool) -> (Router, Arc<AccountStore>) {
    let store = Arc::new(AccountStore::new());
    let config = app_config(log_directory, unique, api::default_routes(store.clone()));
    (create_app(&config), store)
}

/// ログディレクトリ内のファイルを名前順で返す
#[allow(dead_code)]
pub fn log_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("read log dir")
        .map(|entry| entry.expect("dir entry").path())
        .collect();
    files.sort();
    files
}

/// ログファイルをJSONとして読み込む
#[allow(dead_code)]
pub fn read_log(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).expect("read log file")).expect("valid json")
}

/// 実際のTCPリスナーでRouterを起動する
#[allow(dead_code)]
pub async fn spawn_server(app: Router) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (addr, handle)
}
