//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `ExporterError`は`external_message()`と`error_type()`を提供し、
//! HTTP層が内部情報（URLやホスト名）を漏らさずにレスポンスを組み立てられるようにする。

use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// exporter error type
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Queried service has no definition in the configuration
    #[error("Service not configured: {0}")]
    ServiceNotConfigured(String),

    /// Fetching from the metrics gateway failed
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Malformed request from the HTTP layer
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExporterError {
    /// Returns a safe error message for external clients.
    ///
    /// Full details (gateway URL, transport error) are only written to the logs
    /// through the `Display` implementation.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::Common(_) => "Configuration error",
            Self::ServiceNotConfigured(_) => "Service not configured",
            Self::UpstreamUnavailable(_) => "Metrics gateway unavailable",
            Self::InvalidRequest(_) => "Invalid request",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns a machine readable error type string.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Common(_) => "server_error",
            Self::ServiceNotConfigured(_) => "not_found_error",
            Self::UpstreamUnavailable(_) => "service_unavailable",
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::Internal(_) => "server_error",
        }
    }

    /// Returns true when the error came from the metrics gateway.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_))
    }
}

/// Common layer result type
pub type CommonResult<T> = Result<T, CommonError>;

/// exporter result type
pub type ExporterResult<T> = Result<T, ExporterError>;
