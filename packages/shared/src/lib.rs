//! Utilities shared by the Akari server and client.

pub mod logger;
pub mod time;
