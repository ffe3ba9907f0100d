//! レプリカ集約
//!
//! 1スクレイプ分のサンプルからサービス単位のステータスを算出する。
//!
//! - レプリカ数未設定: freshなサンプルが1件でもあれば up
//! - レプリカ数`R`設定済み: freshな異なるインスタンスが`R`以上なら up
//!
//! 各サービスの結果はそのサービスのサンプルだけで決まり、サンプルの順序には依存しない。
//! レプリカ集合は毎サイクル空から作り直すため、消えたインスタンスは次のサイクルで落ちる。

use super::freshness::FreshnessPolicy;
use heartbeat_exporter_common::types::{
    HeartbeatSample, ServiceDefinition, ServiceReplicas, ServiceStatus, STATUS_DOWN, STATUS_UP,
};
use std::collections::HashMap;

/// 1スクレイプサイクルの集約結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeOutcome {
    /// サービスごとのステータス
    pub status: ServiceStatus,
    /// サービスごとのfreshなインスタンス
    pub service_replicas: ServiceReplicas,
}

/// サンプルを集約してステータスとレプリカ集合を算出する
pub fn aggregate(
    samples: &[HeartbeatSample],
    services: &[ServiceDefinition],
    policy: &FreshnessPolicy,
    now: f64,
) -> ScrapeOutcome {
    let replica_counts: HashMap<&str, u32> = services
        .iter()
        .filter_map(|s| s.expected_replica_count.map(|r| (s.name.as_str(), r)))
        .collect();

    let mut status: ServiceStatus = services
        .iter()
        .map(|s| (s.name.clone(), STATUS_DOWN))
        .collect();
    let mut service_replicas: ServiceReplicas = replica_counts
        .keys()
        .map(|name| (name.to_string(), Default::default()))
        .collect();

    for sample in samples {
        let fresh = policy.is_fresh(sample, now);
        let quorum = replica_counts.contains_key(sample.service.as_str());

        if !quorum {
            let entry = status.entry(sample.service.clone()).or_insert(STATUS_DOWN);
            if fresh {
                *entry = STATUS_UP;
            }
        }

        // instance == service のpushはインスタンス情報を持たない
        if fresh && (quorum || sample.instance != sample.service) {
            service_replicas
                .entry(sample.service.clone())
                .or_default()
                .insert(sample.instance.clone());
        }
    }

    for (name, expected) in &replica_counts {
        let fresh = service_replicas.get(*name).map_or(0, |set| set.len());
        let value = if fresh >= *expected as usize {
            STATUS_UP
        } else {
            STATUS_DOWN
        };
        status.insert(name.to_string(), value);
    }

    ScrapeOutcome {
        status,
        service_replicas,
    }
}
