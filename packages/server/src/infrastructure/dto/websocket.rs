//! WebSocket message DTOs.
//!
//! Every frame is a JSON object `{"type": ..., "payload": ...}`. The payload
//! is passed through untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name carried in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    /// server → client, once after connecting
    InitialState,
    /// client → server (full replacement) and server → clients (broadcast)
    RoomUpdate,
}

/// A single WebSocket frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayMessage {
    pub r#type: MessageType,
    /// Missing payload is read as `null` and relayed as such
    #[serde(default)]
    pub payload: Value,
}

impl RelayMessage {
    pub fn new(r#type: MessageType, payload: Value) -> Self {
        Self { r#type, payload }
    }

    pub fn room_update(payload: Value) -> Self {
        Self::new(MessageType::RoomUpdate, payload)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_state_wire_format() {
        // テスト項目: initialState が type と payload を持つ JSON になる
        // given (前提条件):
        let msg = RelayMessage::new(MessageType::InitialState, json!({"kitchen": {"light1": true}}));

        // when (操作):
        let json = msg.to_json().unwrap();

        // then (期待する結果):
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            json!({"type": "initialState", "payload": {"kitchen": {"light1": true}}})
        );
    }

    #[test]
    fn test_parse_room_update() {
        // テスト項目: クライアントからの roomUpdate をパースできる
        // given (前提条件):
        let text = r#"{"type":"roomUpdate","payload":{"bedroom":{"light1":true}}}"#;

        // when (操作):
        let msg = RelayMessage::from_json(text).unwrap();

        // then (期待する結果):
        assert_eq!(msg.r#type, MessageType::RoomUpdate);
        assert_eq!(msg.payload, json!({"bedroom": {"light1": true}}));
    }

    #[test]
    fn test_parse_room_update_without_payload_yields_null() {
        // テスト項目: payload が無い roomUpdate は null として扱われる
        // given (前提条件):
        let text = r#"{"type":"roomUpdate"}"#;

        // when (操作):
        let msg = RelayMessage::from_json(text).unwrap();

        // then (期待する結果):
        assert_eq!(msg.payload, Value::Null);
    }

    #[test]
    fn test_parse_unknown_type_fails() {
        // テスト項目: 未知の type はパースエラーになる
        // given (前提条件):
        let text = r#"{"type":"chat","payload":"hi"}"#;

        // when (操作):
        let result = RelayMessage::from_json(text);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
