//! 設定管理
//!
//! ServerConfig: 待受アドレス・監査ログディレクトリ等のプロセス設定

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 環境変数のプレフィックス（例: `AUDIT_RELAY_PORT`）
pub const ENV_PREFIX: &str = "AUDIT_RELAY";

/// サーバー設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// ホストアドレス (デフォルト: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// 監査ログの出力先 (デフォルト: "logs")
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,

    /// ファイル名に連番を付与して同一秒の上書きを防ぐ (デフォルト: false)
    #[serde(default)]
    pub unique_log_filenames: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_directory: default_log_directory(),
            unique_log_filenames: false,
        }
    }
}

impl ServerConfig {
    /// 設定ファイル（任意）と `AUDIT_RELAY_*` 環境変数から設定を読み込む
    ///
    /// 優先順位: 環境変数 > 設定ファイル > デフォルト値
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }
        let config = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// バインドアドレス（`host:port`）
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
