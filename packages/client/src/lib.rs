//! CLI client for the Akari room-state relay.
//!
//! Mirrors the shared state pushed by the server and publishes full-state
//! replacements built from simple commands.

pub mod command;
pub mod error;
pub mod formatter;
pub mod mirror;
mod runner;
mod session;
mod ui;

pub use runner::{ReconnectPolicy, run_client};
pub use session::run_client_session;
pub use ui::spawn_readline;
