//! axumサーバー起動・シャットダウンハンドリング

use crate::AppState;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

/// axumサーバーを起動し、シャットダウンシグナルを待機する
pub async fn run(state: AppState, bind_addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!("Heartbeat exporter listening on {}", bind_addr);
    serve(state, listener, shutdown_signal()).await
}

/// 任意のシャットダウン条件でサーバーを動かす
///
/// 停止後にエンジンのPushgatewayクライアントを解放する。
pub async fn serve<F>(state: AppState, listener: TcpListener, signal: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let engine = state.engine.clone();
    let app = crate::api::create_app(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .await?;

    engine.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// シャットダウンシグナルを待機
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::HeartbeatEngine;
    use heartbeat_exporter_common::config::ExporterConfig;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn serve_stops_when_signal_fires_and_closes_engine() {
        let engine = Arc::new(HeartbeatEngine::new(&ExporterConfig::new(
            "http://127.0.0.1:1",
        )));
        let state = AppState {
            engine: engine.clone(),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve(state, listener, async {
            let _ = rx.await;
        }));

        let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
        assert!(response.status().is_success());

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("server task timed out")
            .expect("server task panicked")
            .unwrap();

        // 停止後はPushgatewayへの取得が失敗する
        assert!(engine.scrape().await.unwrap_err().is_upstream());
    }
}
