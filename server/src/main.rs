//! Audit Relay Server Entry Point

use audit_relay::api::{self, accounts::AccountStore};
use audit_relay::cli::Cli;
use audit_relay::config::AppConfig;
use audit_relay::{logging, server};
use audit_relay_common::config::ServerConfig;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Audit Relay v{}", env!("CARGO_PKG_VERSION"));

    let server_config = match ServerConfig::load(cli.config.as_deref()) {
        Ok(config) => cli.apply(config),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(AccountStore::new());
    let config = AppConfig::new(&server_config, api::default_routes(store));

    if let Err(e) = server::run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
