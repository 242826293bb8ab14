//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use std::path::PathBuf;
use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

/// 監査ログ永続化のエラー
///
/// いずれも呼び出し元のHTTPレスポンスには影響させず、ログ出力のみ行う。
#[derive(Debug, Error)]
pub enum AuditError {
    /// 監査レコードのシリアライズ失敗
    #[error("Failed to serialize audit record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// ログディレクトリ作成失敗
    #[error("Failed to create log directory {}: {source}", path.display())]
    CreateDir {
        /// 対象ディレクトリ
        path: PathBuf,
        /// 元のI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// ログファイル書き込み失敗
    #[error("Failed to write audit log {}: {source}", path.display())]
    Write {
        /// 対象ファイル
        path: PathBuf,
        /// 元のI/Oエラー
        #[source]
        source: std::io::Error,
    },
}

/// 共通Result型
pub type Result<T> = std::result::Result<T, CommonError>;
