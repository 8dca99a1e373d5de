//! Server configuration.
//!
//! Every option can be given as a flag or through its environment variable.

use std::path::PathBuf;

use axum::http::HeaderValue;
use clap::Parser;
use thiserror::Error;

use crate::domain::SharedState;

/// Configuration errors, all raised at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read initial state file '{path}': {source}")]
    ReadInitialState {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse initial state file '{path}': {source}")]
    ParseInitialState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),
}

#[derive(Parser, Debug, Clone)]
#[command(name = "akari-server")]
#[command(about = "Real-time room-state relay over WebSocket", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Origin allowed to open the WebSocket channel
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:5173")]
    pub cors_origin: String,

    /// JSON file replacing the built-in initial state
    #[arg(long = "initial-state", env = "INITIAL_STATE_FILE")]
    pub initial_state_file: Option<PathBuf>,
}

impl ServerConfig {
    /// The state the relay starts with.
    ///
    /// The file's JSON is used as is, whatever its shape.
    pub fn load_initial_state(&self) -> Result<SharedState, ConfigError> {
        let Some(path) = &self.initial_state_file else {
            return Ok(SharedState::default());
        };

        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::ReadInitialState {
                path: path.clone(),
                source,
            })?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| ConfigError::ParseInitialState {
                path: path.clone(),
                source,
            })?;

        Ok(SharedState::new(value))
    }

    pub fn cors_origin_header(&self) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(&self.cors_origin)
            .map_err(|_| ConfigError::InvalidCorsOrigin(self.cors_origin.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_with_file(path: Option<PathBuf>) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
            cors_origin: "http://localhost:5173".to_string(),
            initial_state_file: path,
        }
    }

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("akari-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_explicit_flags() {
        // テスト項目: フラグで指定した値が設定に反映される
        // given (前提条件):
        let args = [
            "akari-server",
            "--host",
            "127.0.0.1",
            "--port",
            "4000",
            "--cors-origin",
            "http://example.com",
            "--initial-state",
            "/tmp/state.json",
        ];

        // when (操作):
        let config = ServerConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4000);
        assert_eq!(config.cors_origin, "http://example.com");
        assert_eq!(
            config.initial_state_file,
            Some(PathBuf::from("/tmp/state.json"))
        );
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        // テスト項目: 数値でないポートはエラーになる
        // given (前提条件):
        let args = ["akari-server", "--port", "not-a-port"];

        // when (操作):
        let result = ServerConfig::try_parse_from(args);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_initial_state_defaults_without_file() {
        // テスト項目: ファイル指定が無い場合はデフォルトの状態になる
        // given (前提条件):
        let config = config_with_file(None);

        // when (操作):
        let state = config.load_initial_state().unwrap();

        // then (期待する結果):
        assert_eq!(state, SharedState::default());
    }

    #[test]
    fn test_initial_state_loaded_from_file() {
        // テスト項目: ファイルの JSON がそのまま初期状態になる
        // given (前提条件):
        let path = temp_file("valid.json", r#"{"garage":{"light1":true}}"#);
        let config = config_with_file(Some(path.clone()));

        // when (操作):
        let state = config.load_initial_state().unwrap();

        // then (期待する結果):
        assert_eq!(state.into_value(), json!({"garage": {"light1": true}}));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_initial_state_missing_file() {
        // テスト項目: 存在しないファイルは読み込みエラーになる
        // given (前提条件):
        let config = config_with_file(Some(PathBuf::from("/nonexistent/akari/state.json")));

        // when (操作):
        let result = config.load_initial_state();

        // then (期待する結果):
        assert!(matches!(result, Err(ConfigError::ReadInitialState { .. })));
    }

    #[test]
    fn test_initial_state_invalid_json() {
        // テスト項目: JSON として不正なファイルはパースエラーになる
        // given (前提条件):
        let path = temp_file("invalid.json", "{ not json");
        let config = config_with_file(Some(path.clone()));

        // when (操作):
        let result = config.load_initial_state();

        // then (期待する結果):
        assert!(matches!(result, Err(ConfigError::ParseInitialState { .. })));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_invalid_cors_origin() {
        // テスト項目: ヘッダー値として不正なオリジンはエラーになる
        // given (前提条件):
        let mut config = config_with_file(None);
        config.cors_origin = "http://bad\norigin".to_string();

        // when (操作):
        let result = config.cors_origin_header();

        // then (期待する結果):
        assert!(matches!(result, Err(ConfigError::InvalidCorsOrigin(_))));
    }
}
