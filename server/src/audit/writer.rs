//! 監査ログのファイル書き出し
//!
//! 1レコード1ファイル。タブインデントのJSONとして
//! `<log_directory>/log - <YYYY-MM-DD_HH-MM-SS>.json` に書き込む。
//! 失敗はログに出すだけで呼び出し元へは返さない。

use crate::audit::types::AuditRecord;
use audit_relay_common::error::AuditError;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// ファイル名のタイムスタンプ書式（1秒単位）
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// ログファイル名の付け方
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFileNaming {
    /// `log - <timestamp>.json`。同一秒内のレコードは後勝ちで上書きされる
    #[default]
    Timestamp,
    /// `log - <timestamp> - <n>.json`。プロセス内連番で上書きを防ぐ
    Sequenced,
}

/// 監査レコードの永続化
#[derive(Debug)]
pub struct LogPersister {
    directory: PathBuf,
    naming: LogFileNaming,
    sequence: AtomicU64,
}

impl LogPersister {
    /// 出力先ディレクトリとファイル名規則を指定して作成
    pub fn new(directory: impl Into<PathBuf>, naming: LogFileNaming) -> Self {
        Self {
            directory: directory.into(),
            naming,
            sequence: AtomicU64::new(0),
        }
    }

    /// レコードを書き出す。失敗しても呼び出し元には伝えない
    pub async fn persist(&self, record: &AuditRecord) {
        match self.try_persist(record).await {
            Ok(path) => debug!(path = %path.display(), "audit record written"),
            Err(e) => warn!("Dropping audit record: {}", e),
        }
    }

    /// レコードを書き出し、書き込んだパスを返す
    pub async fn try_persist(&self, record: &AuditRecord) -> Result<PathBuf, AuditError> {
        self.try_persist_at(record, Local::now()).await
    }

    pub(crate) async fn try_persist_at(
        &self,
        record: &AuditRecord,
        now: DateTime<Local>,
    ) -> Result<PathBuf, AuditError> {
        let contents = to_pretty_json(record)?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| AuditError::CreateDir {
                path: self.directory.clone(),
                source,
            })?;

        let path = self.directory.join(self.file_name(now));
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| AuditError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }

    fn file_name(&self, now: DateTime<Local>) -> String {
        let timestamp = now.format(TIMESTAMP_FORMAT);
        match self.naming {
            LogFileNaming::Timestamp => format!("log - {}.json", timestamp),
            LogFileNaming::Sequenced => {
                let n = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
                format!("log - {} - {}.json", timestamp, n)
            }
        }
    }
}

/// タブインデントで整形したJSONにシリアライズする
pub fn to_pretty_json(record: &AuditRecord) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut serializer)?;
    Ok(buf)
}
