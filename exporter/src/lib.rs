//! Heartbeat Exporter Server
//!
//! PushgatewayのハートビートからサービスのUP/DOWNを判定し、プローブとして公開するサーバー

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// CLIインターフェース
pub mod cli;

/// 時刻ソース
pub mod clock;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// ハートビートエンジン（ステータスキャッシュ）
pub mod engine;

/// Pushgatewayクライアント
pub mod gateway;

/// ハートビートのパース・freshness判定・集約
pub mod heartbeat;

/// ロギング初期化ユーティリティ
pub mod logging;

/// axumサーバー起動
pub mod server;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// プロセスで共有するハートビートエンジン
    pub engine: std::sync::Arc<engine::HeartbeatEngine>,
}
