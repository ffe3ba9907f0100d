//! Contract Test: ステータス一覧 (GET /)、スナップショット (GET /config)、ヘルス (GET /health)

use crate::support::{build_app, get, heartbeat, mount_metrics};
use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn list_returns_all_statuses_as_pretty_json() {
    let gateway = MockServer::start().await;
    let body = [
        heartbeat("api", "a1", 10.0),
        heartbeat("worker", "w1", 5.0),
        heartbeat("worker", "w2", 5.0),
    ]
    .concat();
    mount_metrics(&gateway, body, 1).await;
    let app = build_app(&gateway);

    let (status, content_type, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    assert!(body.ends_with("}\n"));
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, json!({"api": 1, "worker": 1}));
}

#[tokio::test]
async fn list_fails_with_bad_gateway_when_upstream_is_down() {
    let gateway = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metrics"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&gateway)
        .await;
    let app = build_app(&gateway);

    let (status, _, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Metrics gateway unavailable");
    assert!(!body.contains(&gateway.uri()));
}

#[tokio::test]
async fn config_returns_snapshot_with_replica_sets() {
    let gateway = MockServer::start().await;
    let body = [
        heartbeat("api", "a1", 10.0),
        heartbeat("worker", "w1", 5.0),
        heartbeat("worker", "w2", 120.0),
    ]
    .concat();
    mount_metrics(&gateway, body, 1).await;
    let app = build_app(&gateway);

    let (status, _, body) = get(&app, "/config").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json,
        json!({
            "status": {"api": 1, "worker": 0},
            "replicas": {"worker": 2},
            "service_replicas": {"api": ["a1"], "worker": ["w1"]}
        })
    );
}

#[tokio::test]
async fn health_does_not_touch_gateway() {
    let gateway = MockServer::start().await;
    mount_metrics(&gateway, String::new(), 0).await;
    let app = build_app(&gateway);

    let (status, _, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
}
