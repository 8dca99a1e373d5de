//! Domain layer
//!
//! Value objects, entities and the ports (traits) that the relay depends on.
//! Nothing in here knows about WebSocket or JSON framing.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod value_object;

pub use entity::ClientConnection;
pub use error::MessagePushError;
pub use message_pusher::{MessagePusher, Notification, PusherChannel};
pub use value_object::{ConnectionId, SharedState, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
