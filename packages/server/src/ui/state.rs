//! Server state shared by the handlers.

use crate::usecase::RelayHandle;

/// Shared application state
pub struct AppState {
    /// Entry point to the relay dispatcher
    pub relay: RelayHandle,
}
