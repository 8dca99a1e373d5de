//! Conversion logic between DTOs and domain types.

use akari_shared::time::timestamp_to_rfc3339;

use crate::domain::{ClientConnection, Notification};
use crate::infrastructure::dto::{
    http::ConnectionDto,
    websocket::{MessageType, RelayMessage},
};

// ========================================
// Domain → DTO
// ========================================

impl From<&Notification> for RelayMessage {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::InitialState(state) => {
                RelayMessage::new(MessageType::InitialState, state.as_value().clone())
            }
            Notification::RoomUpdate(state) => {
                RelayMessage::new(MessageType::RoomUpdate, state.as_value().clone())
            }
        }
    }
}

impl From<ClientConnection> for ConnectionDto {
    fn from(connection: ClientConnection) -> Self {
        Self {
            id: connection.id.into_string(),
            connected_at: timestamp_to_rfc3339(connection.connected_at.value()),
        }
    }
}
