//! ステータス一覧・診断APIハンドラー

use super::error::AppError;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use heartbeat_exporter_common::error::ExporterError;
use heartbeat_exporter_common::types::ConfigurationSnapshot;
use serde_json::json;

/// GET / - 全サービスのステータス一覧
pub async fn list_statuses(State(state): State<AppState>) -> Result<Response, AppError> {
    let statuses = state.engine.all_statuses().await?;
    let mut body = serde_json::to_string_pretty(&statuses)
        .map_err(|e| ExporterError::Internal(format!("Failed to encode statuses: {}", e)))?;
    body.push('\n');
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// GET /config - 設定とレプリカ状態のスナップショット
pub async fn configuration(
    State(state): State<AppState>,
) -> Result<Json<ConfigurationSnapshot>, AppError> {
    Ok(Json(state.engine.configuration_snapshot().await?))
}

/// GET /health - exporter自身の稼働確認（Pushgatewayには問い合わせない）
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
