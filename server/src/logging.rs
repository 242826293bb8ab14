//! ロギング初期化ユーティリティ

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログレベル指定の環境変数
pub const LOG_LEVEL_ENV: &str = "AUDIT_RELAY_LOG_LEVEL";

/// tracingサブスクライバーを初期化する
///
/// `AUDIT_RELAY_LOG_LEVEL` が未設定または不正な場合は `info`。
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
}
