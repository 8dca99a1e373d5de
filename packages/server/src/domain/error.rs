//! Domain errors.

use thiserror::Error;

/// Errors raised while pushing a notification to a client connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// No channel is registered for the connection
    #[error("Connection '{0}' is not registered")]
    ClientNotFound(String),

    /// The outbound channel is closed (the socket task has ended)
    #[error("Failed to push message: {0}")]
    PushFailed(String),

    /// The notification could not be encoded for the wire
    #[error("Failed to encode message: {0}")]
    Encode(String),
}
