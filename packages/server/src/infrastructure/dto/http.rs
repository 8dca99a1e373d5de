//! HTTP API response DTOs.

use serde::Serialize;

/// Health check response
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthDto {
    pub status: String,
}

impl HealthDto {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// One registered connection, as shown by the debug endpoint
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDto {
    pub id: String,
    /// RFC 3339, UTC
    pub connected_at: String,
}
