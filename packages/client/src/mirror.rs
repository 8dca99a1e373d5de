//! Local copy of the shared state.
//!
//! The mirror only follows what the server sends. Edits produce a new full
//! state to publish and leave the mirror untouched until the server echoes it.

use serde_json::{Map, Value};

use akari_server::infrastructure::dto::websocket::RelayMessage;

use crate::error::ClientError;

#[derive(Debug, Default, Clone)]
pub struct StateMirror {
    state: Option<Value>,
}

impl StateMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the payload of an `initialState` or `roomUpdate` as the new state
    pub fn apply(&mut self, message: RelayMessage) {
        self.state = Some(message.payload);
    }

    pub fn current(&self) -> Option<&Value> {
        self.state.as_ref()
    }

    /// Full state with one light flipped. Missing rooms and lights are created.
    pub fn toggled(&self, room: &str, light: &str) -> Result<Value, ClientError> {
        self.with_light(room, light, |current| !current.unwrap_or(false))
    }

    /// Full state with one light set
    pub fn switched(&self, room: &str, light: &str, on: bool) -> Result<Value, ClientError> {
        self.with_light(room, light, |_| on)
    }

    fn with_light(
        &self,
        room: &str,
        light: &str,
        f: impl FnOnce(Option<bool>) -> bool,
    ) -> Result<Value, ClientError> {
        let mut state = self.state.clone().ok_or(ClientError::NoState)?;

        let rooms = state
            .as_object_mut()
            .ok_or_else(|| ClientError::NotAnObject("state".to_string()))?;
        let lights = rooms
            .entry(room.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| ClientError::NotAnObject(room.to_string()))?;

        let current = lights.get(light).and_then(Value::as_bool);
        lights.insert(light.to_string(), Value::Bool(f(current)));

        Ok(state)
    }
}
