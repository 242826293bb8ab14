//! 起動時設定
//!
//! プロセス起動時に一度だけ組み立て、サーバーへ渡す

use crate::audit::writer::LogFileNaming;
use crate::routes::RouteTable;
use audit_relay_common::config::ServerConfig;
use std::path::PathBuf;

/// アプリケーション設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 待受アドレス（`host:port`）
    pub listen_address: String,
    /// 監査ログの出力先
    pub log_directory: PathBuf,
    /// ログファイル名の付け方
    pub log_file_naming: LogFileNaming,
    /// ルートテーブル
    pub route_table: RouteTable,
}

impl AppConfig {
    /// サーバー設定とルートテーブルから作成
    pub fn new(server: &ServerConfig, route_table: RouteTable) -> Self {
        let log_file_naming = if server.unique_log_filenames {
            LogFileNaming::Sequenced
        } else {
            LogFileNaming::Timestamp
        };
        Self {
            listen_address: server.bind_addr(),
            log_directory: server.log_directory.clone(),
            log_file_naming,
            route_table,
        }
    }
}
