//! Contract Test: プローブ (GET /probe?target=)

use crate::support::{build_app, get, heartbeat, mount_metrics};
use axum::http::StatusCode;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn probe_reports_up_for_fresh_service() {
    let gateway = MockServer::start().await;
    mount_metrics(&gateway, heartbeat("api", "a1", 10.0), 1).await;
    let app = build_app(&gateway);

    let (status, content_type, body) = get(&app, "/probe?target=api").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/plain; version=0.0.4");
    assert_eq!(
        body,
        "# HELP probe_success Was the probe successful\n# TYPE probe_success gauge\nprobe_success 1\n"
    );
}

#[tokio::test]
async fn probe_reports_down_below_replica_quorum() {
    let gateway = MockServer::start().await;
    let body = [
        heartbeat("api", "a1", 10.0),
        heartbeat("worker", "w1", 5.0),
        heartbeat("worker", "w2", 120.0),
    ]
    .concat();
    // 2回のプローブで取得は1回だけ
    mount_metrics(&gateway, body, 1).await;
    let app = build_app(&gateway);

    let (_, _, api) = get(&app, "/probe?target=api").await;
    let (_, _, worker) = get(&app, "/probe?target=worker").await;

    assert!(api.ends_with("probe_success 1\n"));
    assert!(worker.ends_with("probe_success 0\n"));
}

#[tokio::test]
async fn probe_without_target_is_bad_request() {
    let gateway = MockServer::start().await;
    mount_metrics(&gateway, String::new(), 0).await;
    let app = build_app(&gateway);

    for uri in ["/probe", "/probe?target=", "/probe?target=%20"] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Invalid request: Missing 'target' query parameter");
    }
}

#[tokio::test]
async fn probe_unknown_target_is_not_found() {
    let gateway = MockServer::start().await;
    mount_metrics(&gateway, heartbeat("billing", "b1", 1.0), 0).await;
    let app = build_app(&gateway);

    let (status, _, body) = get(&app, "/probe?target=billing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["type"], "not_found_error");
}

#[tokio::test]
async fn probe_reports_failure_when_gateway_is_down() {
    let gateway = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metrics"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&gateway)
        .await;
    let app = build_app(&gateway);

    let (status, _, body) = get(&app, "/probe?target=api").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.ends_with("probe_success 0\n"));
}
