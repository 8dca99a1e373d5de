//! Infrastructure layer
//!
//! Concrete implementations of the domain ports and the wire formats.

pub mod dto;
pub mod message_pusher;
