//! REST APIハンドラー
//!
//! プローブ、ステータス一覧、診断スナップショット

pub mod error;
pub mod probe;
pub mod status;

use crate::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status::list_statuses))
        .route("/probe", get(probe::probe_service))
        .route("/config", get(status::configuration))
        .route("/health", get(status::health))
        .with_state(state)
}

/// トレースレイヤー付きのアプリケーションを作成
pub fn create_app(state: AppState) -> Router {
    create_router(state).layer(TraceLayer::new_for_http())
}
