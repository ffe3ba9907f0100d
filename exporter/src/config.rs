//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs. The YAML service
//! configuration itself lives in `heartbeat_exporter_common::config`.

use std::path::PathBuf;

/// Default location of the YAML configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/app/config.yml";

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Falls back to `default` when neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// 設定ファイルのパスを取得
///
/// 環境変数 `HEARTBEAT_EXPORTER_CONFIG`（旧: `CONFIG_PATH`）から取得し、
/// 未設定の場合は `/app/config.yml` を返す。
pub fn config_path() -> PathBuf {
    PathBuf::from(get_env_with_fallback_or(
        "HEARTBEAT_EXPORTER_CONFIG",
        "CONFIG_PATH",
        DEFAULT_CONFIG_PATH,
    ))
}
