//! Value objects for the relay domain.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

/// Identifier of one client connection, assigned by the server on upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a fresh random identifier (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for ConnectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The whole application state held by the relay.
///
/// The relay never looks inside: any JSON value is a valid state, and an
/// update replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedState(Value);

impl SharedState {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for SharedState {
    /// Two rooms with two lights each, all switched off.
    fn default() -> Self {
        Self(json!({
            "bedroom": {
                "light1": false,
                "light2": false,
            },
            "kitchen": {
                "light1": false,
                "light2": false,
            },
        }))
    }
}

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_connection_ids_are_unique() {
        // テスト項目: 生成された ConnectionId は毎回異なる
        // given (前提条件):

        // when (操作):
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_default_shared_state_has_all_lights_off() {
        // テスト項目: デフォルトの SharedState は全ての照明が消灯している
        // given (前提条件):

        // when (操作):
        let state = SharedState::default();

        // then (期待する結果):
        assert_eq!(
            state.as_value(),
            &json!({
                "bedroom": {"light1": false, "light2": false},
                "kitchen": {"light1": false, "light2": false},
            })
        );
    }

    #[test]
    fn test_shared_state_serializes_transparently() {
        // テスト項目: SharedState はラップせずに中身の JSON としてシリアライズされる
        // given (前提条件):
        let state = SharedState::new(json!([1, "two", null]));

        // when (操作):
        let json = serde_json::to_string(&state).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"[1,"two",null]"#);
    }
}
