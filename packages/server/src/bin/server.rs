//! Real-time room-state relay server.
//!
//! Holds one shared state, sends it to every client on connect, and
//! broadcasts any full-state `roomUpdate` to all connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin akari-server
//! PORT=4000 cargo run --bin akari-server -- --initial-state state.json
//! ```

use std::sync::Arc;

use akari_server::{
    config::ServerConfig,
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::Server,
    usecase::{Relay, RelayDispatcher},
};
use akari_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::parse();

    // Initialize dependencies in order:
    // 1. Initial state
    // 2. MessagePusher
    // 3. Relay dispatcher
    // 4. Server

    // 1. Load the initial state
    let initial_state = match config.load_initial_state() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    let cors_origin = match config.cors_origin_header() {
        Ok(origin) => origin,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Spawn the relay on its own task
    let relay = Relay::new(initial_state, message_pusher, Arc::new(SystemClock));
    let (relay_handle, _dispatcher_task) = RelayDispatcher::spawn(relay);

    // 4. Create and run the server
    let server = Server::new(relay_handle, cors_origin);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
