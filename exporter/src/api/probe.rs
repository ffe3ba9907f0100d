//! プローブAPIハンドラー
//!
//! `GET /probe?target=<service>`をPrometheusのgauge形式で返す。

use super::error::AppError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use heartbeat_exporter_common::error::ExporterError;
use heartbeat_exporter_common::types::STATUS_DOWN;
use serde::Deserialize;
use tracing::{debug, warn};

/// Prometheus text exposition format
pub const PROBE_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// プローブのクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ProbeQuery {
    /// 対象サービス名
    pub target: Option<String>,
}

/// `probe_success`のgauge本文を生成
pub fn render_probe(status: u8) -> String {
    format!(
        "# HELP probe_success Was the probe successful\n\
         # TYPE probe_success gauge\n\
         probe_success {}\n",
        status
    )
}

/// GET /probe - 単一サービスのプローブ
///
/// Pushgatewayの取得に失敗した場合はエラーではなく`probe_success 0`を返す。
/// 未設定のサービスは404。
pub async fn probe_service(
    State(state): State<AppState>,
    Query(query): Query<ProbeQuery>,
) -> Result<Response, AppError> {
    let target = query
        .target
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            ExporterError::InvalidRequest("Missing 'target' query parameter".to_string())
        })?;

    let status = match state.engine.status_for(&target).await {
        Ok(status) => status,
        Err(e) if e.is_upstream() => {
            warn!(target = %target, error = %e, "Probe failed, reporting probe_success 0");
            STATUS_DOWN
        }
        Err(e) => return Err(e.into()),
    };

    debug!(target = %target, status = status, "Probe answered");
    Ok((
        [(header::CONTENT_TYPE, PROBE_CONTENT_TYPE)],
        render_probe(status),
    )
        .into_response())
}
