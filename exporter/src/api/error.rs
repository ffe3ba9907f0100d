//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use axum::{http::StatusCode, response::IntoResponse, Json};
use heartbeat_exporter_common::error::ExporterError;
use serde_json::json;
use tracing::error;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub ExporterError);

impl From<ExporterError> for AppError {
    fn from(err: ExporterError) -> Self {
        AppError(err)
    }
}

impl AppError {
    /// エラーに対応するHTTPステータスコード
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            ExporterError::ServiceNotConfigured(_) => StatusCode::NOT_FOUND,
            ExporterError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ExporterError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ExporterError::Common(_) | ExporterError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        // クライアント起因のエラーはそのまま返し、それ以外は内部情報を伏せる
        let message = match &self.0 {
            ExporterError::ServiceNotConfigured(_) | ExporterError::InvalidRequest(_) => {
                self.0.to_string()
            }
            other => {
                if status.is_server_error() {
                    error!(error = %other, "Request failed");
                }
                other.external_message().to_string()
            }
        };

        let payload = json!({
            "error": message,
            "type": self.0.error_type(),
        });

        (status, Json(payload)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ExporterError) -> (StatusCode, serde_json::Value) {
        let response = AppError(err).into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_service_not_configured_is_404() {
        let (status, json) =
            body_json(ExporterError::ServiceNotConfigured("billing".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Service not configured: billing");
        assert_eq!(json["type"], "not_found_error");
    }

    #[tokio::test]
    async fn test_upstream_details_are_hidden() {
        let (status, json) = body_json(ExporterError::UpstreamUnavailable(
            "GET http://10.0.0.5:9091/metrics failed".to_string(),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "Metrics gateway unavailable");
    }
}
