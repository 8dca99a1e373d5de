//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, SharedState},
    infrastructure::dto::websocket::{MessageType, RelayMessage},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's channel into the WebSocket sink.
///
/// The relay only ever enqueues into the channel, this task does the socket
/// I/O. It ends when the channel closes or a write fails.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Extract the replacement state from an inbound text frame.
///
/// Returns `None` for frames that are not a `roomUpdate` envelope. The
/// payload itself is never inspected, but `serde_json` refuses documents
/// nested more than 128 levels deep, so such frames are dropped like any
/// other unparsable text.
fn parse_room_update(text: &str) -> Option<SharedState> {
    match RelayMessage::from_json(text) {
        Ok(RelayMessage {
            r#type: MessageType::RoomUpdate,
            payload,
        }) => Some(SharedState::new(payload)),
        Ok(msg) => {
            tracing::warn!("Ignoring message of type {:?} from client", msg.r#type);
            None
        }
        Err(e) => {
            tracing::warn!("Failed to parse message as JSON: {}", e);
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // The relay sends the initial state through the channel as part of connect
    if let Err(e) = state.relay.connect(connection_id.clone(), tx) {
        tracing::error!("Cannot register connection '{}': {}", connection_id, e);
        return;
    }

    let (sender, mut receiver) = socket.split();

    let relay = state.relay.clone();
    let connection_id_clone = connection_id.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let Some(new_state) = parse_room_update(text.as_str()) else {
                        continue;
                    };
                    if let Err(e) = relay.update(connection_id_clone.clone(), new_state) {
                        tracing::error!("Cannot forward room update: {}", e);
                        break;
                    }
                }
                Message::Binary(data) => {
                    tracing::warn!("Ignoring binary frame ({} bytes)", data.len());
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push relay messages to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = state.relay.disconnect(connection_id.clone()) {
        tracing::warn!("Failed to unregister connection '{}': {}", connection_id, e);
    }
}
