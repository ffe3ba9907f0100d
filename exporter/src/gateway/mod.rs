//! Pushgatewayクライアント
//!
//! `GET <pushgateway_url>/metrics`を1回だけ実行してexposition形式の本文を返す。
//! 内容の解釈は行わない。リトライやバックオフは呼び出し側の責務。

use heartbeat_exporter_common::error::{ExporterError, ExporterResult};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tracing::debug;

/// Pushgatewayへの同時リクエスト数の上限
pub const MAX_CONCURRENT_REQUESTS: usize = 10;

const CLOSED_MESSAGE: &str = "gateway client is closed";

/// Pushgatewayクライアント
///
/// 内部の`reqwest::Client`は最初の`fetch()`で生成され、以降のリクエストで再利用される。
/// `close()`で解放すると以後の`fetch()`は`UpstreamUnavailable`で失敗する。
#[derive(Debug)]
pub struct GatewayClient {
    /// `<base_url>/metrics`
    metrics_url: String,
    /// リクエストタイムアウト
    timeout: Duration,
    /// 遅延生成される共有HTTPクライアント
    client: Mutex<Option<Client>>,
    /// 同時リクエスト数の制限
    permits: Semaphore,
}

impl GatewayClient {
    /// 新しいクライアントを作成（HTTPクライアントはまだ生成しない）
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            metrics_url: format!("{}/metrics", base_url.trim_end_matches('/')),
            timeout,
            client: Mutex::new(None),
            permits: Semaphore::new(MAX_CONCURRENT_REQUESTS),
        }
    }

    /// 取得先URL
    pub fn metrics_url(&self) -> &str {
        &self.metrics_url
    }

    /// HTTPクライアントが生成済みかどうか
    pub async fn is_connected(&self) -> bool {
        self.client.lock().await.is_some()
    }

    /// exposition本文を取得
    pub async fn fetch(&self) -> ExporterResult<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ExporterError::UpstreamUnavailable(CLOSED_MESSAGE.to_string()))?;
        let client = self.session().await?;

        let response = client.get(&self.metrics_url).send().await.map_err(|e| {
            ExporterError::UpstreamUnavailable(format!("GET {} failed: {}", self.metrics_url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExporterError::UpstreamUnavailable(format!(
                "GET {} returned HTTP {}",
                self.metrics_url, status
            )));
        }

        let body = response.text().await.map_err(|e| {
            ExporterError::UpstreamUnavailable(format!(
                "Failed to read body from {}: {}",
                self.metrics_url, e
            ))
        })?;

        debug!(url = %self.metrics_url, bytes = body.len(), "Fetched gateway metrics");
        Ok(body)
    }

    /// HTTPクライアントを解放する（プロセス終了時）
    pub async fn close(&self) {
        self.permits.close();
        if self.client.lock().await.take().is_some() {
            debug!(url = %self.metrics_url, "Gateway client closed");
        }
    }

    async fn session(&self) -> ExporterResult<Client> {
        let mut guard = self.client.lock().await;
        if self.permits.is_closed() {
            return Err(ExporterError::UpstreamUnavailable(CLOSED_MESSAGE.to_string()));
        }
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(MAX_CONCURRENT_REQUESTS)
            .build()
            .map_err(|e| ExporterError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        debug!(
            url = %self.metrics_url,
            timeout_secs = self.timeout.as_secs_f64(),
            "Gateway client created"
        );
        *guard = Some(client.clone());
        Ok(client)
    }
}
