//! freshness判定
//!
//! `age = now - timestamp`が閾値未満ならfresh。
//! 時刻ずれで`age`が負になった場合もfreshとして扱い、補正はしない。

use heartbeat_exporter_common::types::{HeartbeatSample, ServiceDefinition};
use std::collections::HashMap;
use std::time::Duration;

/// サービスごとのfreshness閾値
#[derive(Debug, Clone)]
pub struct FreshnessPolicy {
    /// 未設定サービスに使う閾値（秒）
    default_threshold: f64,
    /// 設定済みサービスの閾値（秒）
    thresholds: HashMap<String, f64>,
}

impl FreshnessPolicy {
    /// サービス定義から作成
    pub fn new(default_threshold: Duration, services: &[ServiceDefinition]) -> Self {
        Self {
            default_threshold: default_threshold.as_secs_f64(),
            thresholds: services
                .iter()
                .map(|s| (s.name.clone(), s.freshness_threshold.as_secs_f64()))
                .collect(),
        }
    }

    /// サービスの閾値（秒）
    pub fn threshold(&self, service: &str) -> f64 {
        self.thresholds
            .get(service)
            .copied()
            .unwrap_or(self.default_threshold)
    }

    /// サンプルが`now`時点でfreshかどうか
    pub fn is_fresh(&self, sample: &HeartbeatSample, now: f64) -> bool {
        now - sample.timestamp < self.threshold(&sample.service)
    }
}
