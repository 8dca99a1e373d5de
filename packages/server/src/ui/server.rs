//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::usecase::RelayHandle;

use super::{
    handler::{debug_connections, debug_state, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Room-state relay server
///
/// # Example
///
/// ```ignore
/// let (relay, _task) = RelayDispatcher::spawn(relay);
/// let server = Server::new(relay, HeaderValue::from_static("http://localhost:5173"));
/// server.run("0.0.0.0".to_string(), 3001).await?;
/// ```
pub struct Server {
    relay: RelayHandle,
    /// Origin allowed on the WebSocket route
    cors_origin: HeaderValue,
}

impl Server {
    pub fn new(relay: RelayHandle, cors_origin: HeaderValue) -> Self {
        Self { relay, cors_origin }
    }

    /// Build the router.
    ///
    /// `/ws` allows only the configured origin (GET, POST). The plain HTTP
    /// routes allow any origin.
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            relay: self.relay.clone(),
        });

        let ws_cors = CorsLayer::new()
            .allow_origin(self.cors_origin.clone())
            .allow_methods([Method::GET, Method::POST]);
        let http_cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // WebSocket エンドポイント
        let ws_routes = Router::<Arc<AppState>>::new()
            .route("/ws", get(websocket_handler))
            .layer(ws_cors);

        // HTTP エンドポイント
        let http_routes = Router::<Arc<AppState>>::new()
            .route("/api/health", get(health_check))
            .route("/debug/state", get(debug_state))
            .route("/debug/connections", get(debug_connections))
            .layer(http_cors);

        ws_routes
            .merge(http_routes)
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Bind to `host:port` and serve until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
