//! 設定管理
//!
//! ExporterConfig, ServiceConfig等の設定構造体とYAML読み込み

use crate::error::{CommonError, CommonResult};
use crate::types::ServiceDefinition;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// exporter設定（YAMLファイルのトップレベル）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// PushgatewayのベースURL（必須）
    pub pushgateway_url: String,

    /// スクレイプ間隔（秒）(デフォルト: 10)
    #[serde(default = "default_scrape_interval")]
    pub scrape_interval_seconds: u64,

    /// デフォルトのfreshness閾値（秒）(デフォルト: 10)
    #[serde(default = "default_freshness_threshold")]
    pub default_freshness_threshold_seconds: u64,

    /// Pushgatewayへのリクエストタイムアウト（秒）(デフォルト: 5)
    #[serde(default = "default_gateway_timeout")]
    pub gateway_timeout_seconds: u64,

    /// 監視対象サービス一覧
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

/// サービス設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// サービス名（Pushgatewayの`service`ラベルと一致させる）
    pub name: String,

    /// freshness閾値（秒）。省略時はデフォルト値を使用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshness_threshold_seconds: Option<u64>,

    /// 期待レプリカ数。省略時は単一インスタンスとして判定
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica: Option<u32>,
}

fn default_scrape_interval() -> u64 {
    10
}

fn default_freshness_threshold() -> u64 {
    10
}

fn default_gateway_timeout() -> u64 {
    5
}

impl ExporterConfig {
    /// URLのみ指定した設定を作成（その他はデフォルト値）
    pub fn new(pushgateway_url: impl Into<String>) -> Self {
        Self {
            pushgateway_url: pushgateway_url.into(),
            scrape_interval_seconds: default_scrape_interval(),
            default_freshness_threshold_seconds: default_freshness_threshold(),
            gateway_timeout_seconds: default_gateway_timeout(),
            services: Vec::new(),
        }
    }

    /// YAMLファイルを読み込んで検証する
    pub fn load(path: impl AsRef<Path>) -> CommonResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CommonError::Config(format!(
                "Failed to load configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&text)
    }

    /// YAML文字列をパースして検証する
    pub fn from_yaml_str(text: &str) -> CommonResult<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        if !value.is_mapping() {
            return Err(CommonError::Config(
                "Configuration file format error: expected a mapping".to_string(),
            ));
        }
        let config: Self = serde_yaml::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// 設定値を検証する
    pub fn validate(&self) -> CommonResult<()> {
        let url = self.pushgateway_base_url();
        let host = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"));
        match host {
            Some(rest) if !rest.is_empty() => {}
            _ => {
                return Err(CommonError::Validation(format!(
                    "pushgateway_url must be an http(s) URL, got '{}'",
                    self.pushgateway_url
                )))
            }
        }

        if self.scrape_interval_seconds == 0 {
            return Err(CommonError::Validation(
                "scrape_interval_seconds must be greater than 0".to_string(),
            ));
        }
        if self.default_freshness_threshold_seconds == 0 {
            return Err(CommonError::Validation(
                "default_freshness_threshold_seconds must be greater than 0".to_string(),
            ));
        }
        if self.gateway_timeout_seconds == 0 {
            return Err(CommonError::Validation(
                "gateway_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for service in &self.services {
            if service.name.trim().is_empty() {
                return Err(CommonError::Validation(
                    "service name must not be empty".to_string(),
                ));
            }
            if !seen.insert(service.name.as_str()) {
                return Err(CommonError::Validation(format!(
                    "duplicate service name '{}'",
                    service.name
                )));
            }
            if service.freshness_threshold_seconds == Some(0) {
                return Err(CommonError::Validation(format!(
                    "service '{}': freshness_threshold_seconds must be greater than 0",
                    service.name
                )));
            }
            if service.replica == Some(0) {
                return Err(CommonError::Validation(format!(
                    "service '{}': replica must be >= 1",
                    service.name
                )));
            }
        }

        Ok(())
    }

    /// 末尾の`/`を除いたPushgateway URL
    pub fn pushgateway_base_url(&self) -> &str {
        self.pushgateway_url.trim_end_matches('/')
    }

    /// スクレイプ間隔
    pub fn scrape_interval(&self) -> Duration {
        Duration::from_secs(self.scrape_interval_seconds)
    }

    /// デフォルトのfreshness閾値
    pub fn default_freshness_threshold(&self) -> Duration {
        Duration::from_secs(self.default_freshness_threshold_seconds)
    }

    /// Pushgatewayへのリクエストタイムアウト
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_seconds)
    }

    /// 閾値を解決したサービス定義一覧
    pub fn service_definitions(&self) -> Vec<ServiceDefinition> {
        self.services
            .iter()
            .map(|service| ServiceDefinition {
                name: service.name.clone(),
                freshness_threshold: service
                    .freshness_threshold_seconds
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| self.default_freshness_threshold()),
                expected_replica_count: service.replica,
            })
            .collect()
    }
}
