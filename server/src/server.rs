//! サーバー起動

use crate::audit::writer::LogPersister;
use crate::config::AppConfig;
use crate::routes::create_router;
use axum::Router;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// サーバー起動エラー
#[derive(Debug, Error)]
pub enum ServerError {
    /// アドレスのバインド失敗
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// 待受アドレス
        address: String,
        /// 元のI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// 実行中のエラー
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// 設定からRouterを作成
pub fn create_app(config: &AppConfig) -> Router {
    let persister = Arc::new(LogPersister::new(
        config.log_directory.clone(),
        config.log_file_naming,
    ));
    create_router(config.route_table.clone(), persister)
}

/// サーバーを起動し、Ctrl+Cで停止するまで待つ
pub async fn run(config: AppConfig) -> Result<(), ServerError> {
    let app = create_app(&config);

    let listener = tokio::net::TcpListener::bind(&config.listen_address)
        .await
        .map_err(|source| ServerError::Bind {
            address: config.listen_address.clone(),
            source,
        })?;

    info!(
        address = %config.listen_address,
        log_directory = %config.log_directory.display(),
        routes = ?config.route_table,
        "Audit relay server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
