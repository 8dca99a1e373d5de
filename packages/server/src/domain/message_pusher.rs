//! MessagePusher trait 定義
//!
//! The relay pushes notifications to client connections through this port.
//! The concrete implementation (WebSocket channels) lives in the
//! infrastructure layer, so the relay never depends on the transport.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    entity::ClientConnection,
    error::MessagePushError,
    value_object::{ConnectionId, SharedState},
};

/// Outbound channel of one connection. Carries encoded text frames.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// A message the relay sends to clients
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Current state, sent once right after a connection is registered
    InitialState(SharedState),
    /// New state after an overwrite, sent to every connection
    RoomUpdate(SharedState),
}

/// Push notifications to registered client connections.
///
/// The implementation also owns the connection registry: a connection is
/// "active" exactly while its channel is registered here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection's outbound channel
    async fn register_client(&self, connection: ClientConnection, sender: PusherChannel);

    /// Remove a connection's outbound channel
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Push a notification to a single connection
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// Push a notification to every registered connection.
    ///
    /// Returns the number of connections the message was handed to. Failing
    /// connections are skipped, not reported as an error.
    async fn broadcast(&self, notification: &Notification) -> Result<usize, MessagePushError>;

    /// Registered connections, oldest first
    async fn connections(&self) -> Vec<ClientConnection>;
}
