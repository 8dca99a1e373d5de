//! UseCase 層のエラー型

use thiserror::Error;

/// Errors returned by `RelayHandle`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// The dispatcher task is no longer running
    #[error("Relay dispatcher has stopped")]
    Closed,
}
