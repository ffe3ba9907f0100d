//! 契約テスト共通ヘルパー

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use heartbeat_exporter::{api, clock::ManualClock, engine::HeartbeatEngine, AppState};
use heartbeat_exporter_common::config::{ExporterConfig, ServiceConfig};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// テスト用の固定時刻
pub const NOW: f64 = 1_700_000_000.0;

/// api（閾値30秒）とworker（閾値60秒・レプリカ2）を監視する設定
pub fn exporter_config(gateway_url: &str) -> ExporterConfig {
    let mut config = ExporterConfig::new(gateway_url);
    config.services = vec![
        ServiceConfig {
            name: "api".to_string(),
            freshness_threshold_seconds: Some(30),
            replica: None,
        },
        ServiceConfig {
            name: "worker".to_string(),
            freshness_threshold_seconds: Some(60),
            replica: Some(2),
        },
    ];
    config
}

/// NOWから`age`秒前のハートビート行
pub fn heartbeat(service: &str, instance: &str, age: f64) -> String {
    format!(
        "loop_heartbeat_timestamp_seconds{{instance=\"{}\",job=\"heartbeat\",service=\"{}\"}} {:e}\n",
        instance,
        service,
        NOW - age
    )
}

/// Pushgatewayの`/metrics`を指定本文で応答させる
pub async fn mount_metrics(gateway: &MockServer, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path("/metrics"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(gateway)
        .await;
}

/// 時刻を固定したエンジンでルーターを構築
pub fn build_app(gateway: &MockServer) -> Router {
    let engine = HeartbeatEngine::new(&exporter_config(&gateway.uri()))
        .with_clock(Arc::new(ManualClock::new(NOW)));
    api::create_app(AppState {
        engine: Arc::new(engine),
    })
}

/// GETリクエストを送り、ステータス・Content-Type・本文を返す
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}
