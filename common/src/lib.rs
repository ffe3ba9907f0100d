//! Heartbeat Exporter Common Library
//!
//! exporter本体と設定検証で共有する型・設定・エラー定義

#![warn(missing_docs)]

/// 設定管理（YAML読み込み・検証）
pub mod config;

/// エラー型定義
pub mod error;

/// 共通型定義
pub mod types;
