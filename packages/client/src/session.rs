//! WebSocket client session management.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use akari_server::infrastructure::dto::websocket::{MessageType, RelayMessage};

use crate::{
    command::{Action, Command, resolve_command},
    error::ClientError,
    formatter::StateFormatter,
    mirror::StateMirror,
};

use super::ui::redisplay_prompt;

/// Run one WebSocket client session, reading commands from `input`.
///
/// Returns `Ok(())` on `quit` or when `input` closes.
/// `ClientError::Connection` means the server could not be reached and
/// `ClientError::ConnectionLost` means an established connection went away.
pub async fn run_client_session(
    url: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))?;

    tracing::info!("Connected to relay server!");
    println!("\nType 'help' for commands. Press Ctrl+C to exit.\n");

    let (mut write, mut read) = ws_stream.split();
    let mirror = Arc::new(Mutex::new(StateMirror::new()));

    // Spawn a task to handle incoming messages. It only returns once the
    // connection is gone.
    let mirror_for_read = mirror.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match RelayMessage::from_json(text.as_str()) {
                        Ok(relay_msg) => {
                            let title = match relay_msg.r#type {
                                MessageType::InitialState => "Initial state",
                                MessageType::RoomUpdate => "Room update",
                            };
                            print!("{}", StateFormatter::format_state(title, &relay_msg.payload));
                            mirror_for_read.lock().await.apply(relay_msg);
                        }
                        // If parsing fails, display as raw text
                        Err(_) => print!("{}", StateFormatter::format_raw_message(text.as_str())),
                    }
                    redisplay_prompt();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Turn commands into full-state updates. Returns true when the socket
    // rejected a write.
    let write_loop = async {
        while let Some(line) = input.recv().await {
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };

            let action = {
                let mirror = mirror.lock().await;
                resolve_command(command, &mirror)
            };
            let new_state = match action {
                Ok(Action::Publish(state)) => state,
                Ok(Action::Print(text)) => {
                    print!("{}", text);
                    continue;
                }
                Ok(Action::Quit) => break,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };

            let json = match RelayMessage::room_update(new_state).to_json() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize room update: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send room update: {}", e);
                return true;
            }
        }

        write.close().await.ok();
        false
    };

    tokio::select! {
        _ = &mut read_task => Err(ClientError::ConnectionLost),
        write_error = write_loop => {
            read_task.abort();
            if write_error {
                Err(ClientError::ConnectionLost)
            } else {
                Ok(())
            }
        }
    }
}
