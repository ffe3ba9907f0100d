//! 共通型定義
//!
//! ServiceDefinition, HeartbeatSample, ConfigurationSnapshot等のコアデータ型

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// 稼働中を表すステータス値
pub const STATUS_UP: u8 = 1;

/// 停止中（または不明）を表すステータス値
pub const STATUS_DOWN: u8 = 0;

/// サービス名 → ステータス（1 = up, 0 = down）
pub type ServiceStatus = BTreeMap<String, u8>;

/// サービス名 → 現在freshなインスタンスID集合
pub type ServiceReplicas = BTreeMap<String, BTreeSet<String>>;

/// 監視対象サービスの定義
///
/// 設定読み込み後は不変。エンジンは`Arc`経由で参照のみ行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// サービス名（一意）
    pub name: String,
    /// ハートビートをfreshとみなす最大経過時間
    pub freshness_threshold: Duration,
    /// 期待レプリカ数（Someの場合はクォーラム判定）
    pub expected_replica_count: Option<u32>,
}

impl ServiceDefinition {
    /// 単一インスタンスのサービス定義を作成
    pub fn new(name: impl Into<String>, freshness_threshold: Duration) -> Self {
        Self {
            name: name.into(),
            freshness_threshold,
            expected_replica_count: None,
        }
    }

    /// 期待レプリカ数を設定
    pub fn with_replicas(mut self, count: u32) -> Self {
        self.expected_replica_count = Some(count);
        self
    }
}

/// Pushgatewayから読み取った1件のハートビート
#[derive(Debug, Clone, PartialEq)]
pub struct HeartbeatSample {
    /// `instance`ラベルの値
    pub instance: String,
    /// `service`ラベルの値
    pub service: String,
    /// UNIXエポックからの秒数
    pub timestamp: f64,
}

/// 診断用の設定・状態スナップショット
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSnapshot {
    /// サービスごとの現在のステータス
    pub status: ServiceStatus,
    /// レプリカ数が設定されたサービスの期待レプリカ数
    pub replicas: BTreeMap<String, u32>,
    /// サービスごとの現在freshなインスタンス
    pub service_replicas: ServiceReplicas,
}
