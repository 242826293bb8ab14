//! CLI定義

use audit_relay_common::config::ServerConfig;
use clap::Parser;
use std::path::PathBuf;

/// Audit relay - HTTP request/response audit logging server
#[derive(Parser, Debug)]
#[command(name = "audit-relay")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    AUDIT_RELAY_HOST                  Bind address (default: 0.0.0.0)
    AUDIT_RELAY_PORT                  Listen port (default: 8080)
    AUDIT_RELAY_LOG_DIRECTORY         Audit log directory (default: logs)
    AUDIT_RELAY_UNIQUE_LOG_FILENAMES  Append a sequence number to log file names
    AUDIT_RELAY_LOG_LEVEL             Log level (default: info)
"#)]
pub struct Cli {
    /// Config file (JSON/TOML/YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Bind address
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Audit log directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Append a sequence number to log file names
    #[arg(long, default_value_t = false)]
    pub unique_log_filenames: bool,
}

impl Cli {
    /// コマンドライン引数で設定を上書きする
    pub fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_directory = log_dir.clone();
        }
        if self.unique_log_filenames {
            config.unique_log_filenames = true;
        }
        config
    }
}
