//! Domain entities.

use super::value_object::{ConnectionId, Timestamp};

/// One connected client as seen by the relay.
///
/// Nothing about a connection is kept after it disconnects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConnection {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
}

impl ClientConnection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self { id, connected_at }
    }
}
