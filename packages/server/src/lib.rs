//! Real-time room-state relay.
//!
//! Clients connect over WebSocket, receive the current shared state, and may
//! replace it with a full new state that is then broadcast to every client.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
