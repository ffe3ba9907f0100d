//! serve サブコマンド
//!
//! 設定を読み込み、エンジンを1つ生成してHTTPサーバーを起動します。

use crate::config::{
    config_path, get_env_with_fallback_or, get_env_with_fallback_parse, DEFAULT_HOST,
    DEFAULT_PORT,
};
use crate::engine::HeartbeatEngine;
use crate::{server, AppState};
use clap::Args;
use heartbeat_exporter_common::config::ExporterConfig;
use heartbeat_exporter_common::error::{ExporterError, ExporterResult};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "HEARTBEAT_EXPORTER_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = DEFAULT_HOST, env = "HEARTBEAT_EXPORTER_HOST")]
    pub host: String,

    /// Configuration file (YAML)
    #[arg(short, long, env = "HEARTBEAT_EXPORTER_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ServeArgs {
    /// サブコマンド省略時に環境変数から組み立てる
    pub fn from_env() -> Self {
        Self {
            port: get_env_with_fallback_parse(
                "HEARTBEAT_EXPORTER_PORT",
                "HEARTBEAT_EXPORTER_PORT",
                DEFAULT_PORT,
            ),
            host: get_env_with_fallback_or(
                "HEARTBEAT_EXPORTER_HOST",
                "HEARTBEAT_EXPORTER_HOST",
                DEFAULT_HOST,
            ),
            config: None,
        }
    }

    /// 設定ファイルのパス（未指定なら環境変数・デフォルト）
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_path)
    }

    /// バインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// サーバーを起動し、停止するまで待機する
pub async fn execute(args: &ServeArgs) -> ExporterResult<()> {
    let path = args.config_path();
    let config = ExporterConfig::load(&path)?;

    info!(
        config = %path.display(),
        pushgateway_url = %config.pushgateway_base_url(),
        scrape_interval_secs = config.scrape_interval_seconds,
        services = config.services.len(),
        "Heartbeat exporter v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let state = AppState {
        engine: Arc::new(HeartbeatEngine::new(&config)),
    };

    server::run(state, &args.bind_addr())
        .await
        .map_err(|e| ExporterError::Internal(format!("Server error: {}", e)))
}
