//! Error types for the Akari client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error, PartialEq)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// An established connection was closed or failed
    #[error("Connection lost")]
    ConnectionLost,

    /// The input line is not a valid command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Nothing has been received from the server yet
    #[error("No state received from the server yet")]
    NoState,

    /// The state cannot be edited as a room map
    #[error("Cannot edit state: '{0}' is not an object")]
    NotAnObject(String),
}
