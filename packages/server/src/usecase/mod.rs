//! UseCase layer
//!
//! `Relay` holds the shared state and implements connect / update /
//! disconnect. `RelayDispatcher` runs one `Relay` on a single task and
//! `RelayHandle` is how the UI layer talks to it.

mod dispatcher;
mod error;
mod relay;

pub use dispatcher::{RelayDispatcher, RelayHandle};
pub use error::RelayError;
pub use relay::Relay;
