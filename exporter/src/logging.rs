//! ロギング初期化
//!
//! `HEARTBEAT_EXPORTER_LOG_LEVEL`（未設定なら`RUST_LOG`、どちらもなければ`info`）で
//! フィルタした`tracing-subscriber`のfmt出力を設定する。

use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter};

/// ログレベル指定用の環境変数
pub const LOG_LEVEL_ENV: &str = "HEARTBEAT_EXPORTER_LOG_LEVEL";

const DEFAULT_DIRECTIVE: &str = "info";

/// 環境変数からフィルタを組み立てる
pub fn filter_from_env() -> EnvFilter {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// グローバルsubscriberを設定する（プロセスで1回だけ）
pub fn init() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(filter_from_env())
        .with(fmt::layer().with_target(false))
        .try_init()
}
