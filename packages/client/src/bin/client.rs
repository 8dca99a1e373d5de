//! Interactive client for the Akari room-state relay.
//!
//! Shows the shared state pushed by the server and publishes full-state
//! updates from commands such as `toggle kitchen light1`.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin akari-client
//! cargo run --bin akari-client -- --url ws://192.168.0.10:3001/ws
//! ```

use clap::Parser;

use akari_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "akari-client")]
#[command(about = "Interactive client for the room-state relay", long_about = None)]
struct Args {
    /// WebSocket URL of the relay server
    #[arg(short = 'u', long, env = "AKARI_URL", default_value = "ws://127.0.0.1:3001/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    let input = akari_client::spawn_readline();
    let policy = akari_client::ReconnectPolicy::default();
    if let Err(e) = akari_client::run_client(&args.url, policy, input).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
