//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::http::{ConnectionDto, HealthDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto::ok())
}

/// Debug endpoint returning the current shared state as is
pub async fn debug_state(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match state.relay.snapshot().await {
        Ok(snapshot) => Ok(Json(snapshot.into_value())),
        Err(e) => {
            tracing::error!("Failed to read shared state: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Debug endpoint listing the registered connections
pub async fn debug_connections(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConnectionDto>>, StatusCode> {
    match state.relay.connections().await {
        Ok(connections) => Ok(Json(
            connections.into_iter().map(ConnectionDto::from).collect(),
        )),
        Err(e) => {
            tracing::error!("Failed to list connections: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
