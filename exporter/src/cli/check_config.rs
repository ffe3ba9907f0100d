//! check-config サブコマンド
//!
//! 設定ファイルを読み込んで検証し、内容の要約を返します。

use crate::config::config_path;
use clap::Args;
use heartbeat_exporter_common::config::ExporterConfig;
use heartbeat_exporter_common::error::ExporterResult;
use std::fmt::Write;
use std::path::PathBuf;

/// check-config サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct CheckConfigArgs {
    /// Configuration file (YAML)
    #[arg(short, long, env = "HEARTBEAT_EXPORTER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// 設定を検証して要約文字列を返す
pub fn execute(args: &CheckConfigArgs) -> ExporterResult<String> {
    let path = args.config.clone().unwrap_or_else(config_path);
    let config = ExporterConfig::load(&path)?;

    let mut out = String::new();
    let _ = writeln!(out, "Configuration OK: {}", path.display());
    let _ = writeln!(out, "  pushgateway_url: {}", config.pushgateway_base_url());
    let _ = writeln!(
        out,
        "  scrape_interval_seconds: {}",
        config.scrape_interval_seconds
    );
    let _ = writeln!(
        out,
        "  default_freshness_threshold_seconds: {}",
        config.default_freshness_threshold_seconds
    );
    let _ = writeln!(out, "  services: {}", config.services.len());
    for def in config.service_definitions() {
        let _ = match def.expected_replica_count {
            Some(replicas) => writeln!(
                out,
                "    - {} (threshold {}s, replica {})",
                def.name,
                def.freshness_threshold.as_secs(),
                replicas
            ),
            None => writeln!(
                out,
                "    - {} (threshold {}s)",
                def.name,
                def.freshness_threshold.as_secs()
            ),
        };
    }
    Ok(out)
}
