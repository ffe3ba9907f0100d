//! ハートビートエンジン（ステータスキャッシュ）
//!
//! 問い合わせ時にキャッシュの鮮度を確認し、`scrape_interval`を過ぎていれば
//! Pushgateway取得 → パース → freshness判定 → 集約 のサイクルを実行してから応答する。
//!
//! キャッシュの状態（ステータス・レプリカ集合・最終取得時刻）は1つの`RwLock`の中で
//! まとめて差し替えるため、読み手が異なるサイクルの値を混在して観測することはない。
//! 同時に期限切れを検出した呼び出しはスクレイプロックで直列化され、
//! 待っていた側はロック取得後に鮮度を再確認して取得を省略する。
//! 待機中のサイクルが失敗していた場合も再取得せず、そのサイクルのエラーを共有する。

use crate::clock::{Clock, SystemClock};
use crate::gateway::GatewayClient;
use crate::heartbeat::{aggregate, parse, FreshnessPolicy};
use heartbeat_exporter_common::config::ExporterConfig;
use heartbeat_exporter_common::error::{ExporterError, ExporterResult};
use heartbeat_exporter_common::types::{
    ConfigurationSnapshot, ServiceDefinition, ServiceReplicas, ServiceStatus, STATUS_DOWN,
    STATUS_UP,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// 直近のスクレイプ結果
#[derive(Debug)]
struct ScrapeCache {
    status: ServiceStatus,
    service_replicas: ServiceReplicas,
    last_fetch: Option<f64>,
}

impl ScrapeCache {
    fn is_fresh(&self, now: f64, interval: f64) -> bool {
        matches!(self.last_fetch, Some(last) if now - last < interval)
    }
}

/// ハートビートエンジン
///
/// プロセスに1つだけ生成し、`Arc`でHTTP層に渡す。
pub struct HeartbeatEngine {
    gateway: GatewayClient,
    services: Vec<ServiceDefinition>,
    known: HashSet<String>,
    replicas: BTreeMap<String, u32>,
    policy: FreshnessPolicy,
    /// スクレイプ間隔（秒）
    scrape_interval: f64,
    clock: Arc<dyn Clock>,
    cache: RwLock<ScrapeCache>,
    /// 完了したスクレイプサイクル数（成功・失敗とも）
    cycles: AtomicU64,
    /// 直近サイクルの失敗理由（成功時は`None`）
    scrape_lock: Mutex<Option<String>>,
}

impl HeartbeatEngine {
    /// 検証済みの設定からエンジンを作成
    pub fn new(config: &ExporterConfig) -> Self {
        let services = config.service_definitions();
        let policy = FreshnessPolicy::new(config.default_freshness_threshold(), &services);
        let replicas: BTreeMap<String, u32> = services
            .iter()
            .filter_map(|s| s.expected_replica_count.map(|r| (s.name.clone(), r)))
            .collect();

        let initial = ScrapeCache {
            status: services
                .iter()
                .map(|s| (s.name.clone(), STATUS_DOWN))
                .collect(),
            service_replicas: replicas
                .keys()
                .map(|name| (name.clone(), Default::default()))
                .collect(),
            last_fetch: None,
        };

        Self {
            gateway: GatewayClient::new(config.pushgateway_base_url(), config.gateway_timeout()),
            known: services.iter().map(|s| s.name.clone()).collect(),
            services,
            replicas,
            policy,
            scrape_interval: config.scrape_interval().as_secs_f64(),
            clock: Arc::new(SystemClock),
            cache: RwLock::new(initial),
            cycles: AtomicU64::new(0),
            scrape_lock: Mutex::new(None),
        }
    }

    /// 時刻ソースを差し替える
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 設定済みサービス定義
    pub fn services(&self) -> &[ServiceDefinition] {
        &self.services
    }

    /// サービスが設定済みかどうか
    pub fn is_configured(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// 単一サービスのステータス（1 = up, 0 = down）
    ///
    /// 未設定のサービス名はスクレイプを行わずに`ServiceNotConfigured`を返す。
    pub async fn status_for(&self, name: &str) -> ExporterResult<u8> {
        if !self.is_configured(name) {
            return Err(ExporterError::ServiceNotConfigured(name.to_string()));
        }
        self.ensure_fresh().await?;
        let cache = self.cache.read().await;
        Ok(cache.status.get(name).copied().unwrap_or(STATUS_DOWN))
    }

    /// 全サービスのステータス
    pub async fn all_statuses(&self) -> ExporterResult<ServiceStatus> {
        self.ensure_fresh().await?;
        Ok(self.cache.read().await.status.clone())
    }

    /// 診断用スナップショット
    pub async fn configuration_snapshot(&self) -> ExporterResult<ConfigurationSnapshot> {
        self.ensure_fresh().await?;
        let cache = self.cache.read().await;
        Ok(ConfigurationSnapshot {
            status: cache.status.clone(),
            replicas: self.replicas.clone(),
            service_replicas: cache.service_replicas.clone(),
        })
    }

    /// スクレイプを行わずに直近の結果を返す
    pub async fn last_known_statuses(&self) -> ServiceStatus {
        self.cache.read().await.status.clone()
    }

    /// 最後に成功したスクレイプの時刻（UNIXエポック秒）
    pub async fn last_fetch(&self) -> Option<f64> {
        self.cache.read().await.last_fetch
    }

    /// 鮮度に関係なくスクレイプサイクルを1回実行する
    pub async fn scrape(&self) -> ExporterResult<()> {
        let mut failure = self.scrape_lock.lock().await;
        self.run_cycle(&mut failure).await
    }

    /// Pushgatewayクライアントを解放する
    pub async fn close(&self) {
        self.gateway.close().await;
        info!("Heartbeat engine closed");
    }

    async fn is_fresh(&self) -> bool {
        let now = self.clock.now();
        self.cache.read().await.is_fresh(now, self.scrape_interval)
    }

    async fn ensure_fresh(&self) -> ExporterResult<()> {
        if self.is_fresh().await {
            return Ok(());
        }
        let observed = self.cycles.load(Ordering::Acquire);
        let mut failure = self.scrape_lock.lock().await;
        // 待機中に別の呼び出しがスクレイプを終えていれば取得しない
        if self.is_fresh().await {
            return Ok(());
        }
        if self.cycles.load(Ordering::Acquire) != observed {
            if let Some(reason) = failure.as_ref() {
                debug!(reason = %reason, "Sharing result of the failed scrape cycle");
                return Err(ExporterError::UpstreamUnavailable(reason.clone()));
            }
        }
        self.run_cycle(&mut failure).await
    }

    /// スクレイプロック保持中に呼ぶ
    async fn run_cycle(&self, failure: &mut Option<String>) -> ExporterResult<()> {
        let started = Instant::now();
        let fetched = self.gateway.fetch().await;
        *failure = fetched.as_ref().err().map(|e| match e {
            ExporterError::UpstreamUnavailable(reason) => reason.clone(),
            other => other.to_string(),
        });
        self.cycles.fetch_add(1, Ordering::AcqRel);

        let body = match fetched {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %self.gateway.metrics_url(), error = %e, "Scrape cycle failed");
                return Err(e);
            }
        };

        let now = self.clock.now();
        let samples = parse(&body);
        let outcome = aggregate(&samples, &self.services, &self.policy, now);
        let up = outcome.status.values().filter(|v| **v == STATUS_UP).count();
        let total = outcome.status.len();

        *self.cache.write().await = ScrapeCache {
            status: outcome.status,
            service_replicas: outcome.service_replicas,
            last_fetch: Some(now),
        };

        debug!(
            samples = samples.len(),
            services = total,
            up = up,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scrape cycle completed"
        );
        Ok(())
    }
}
