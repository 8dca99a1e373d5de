//! Single-task dispatch for the relay.
//!
//! Every event from every connection goes through one channel into one task
//! that owns the `Relay`. Events are handled strictly in arrival order, each
//! to completion, so the shared state never sees concurrent mutation.

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::domain::{ClientConnection, ConnectionId, PusherChannel, SharedState};

use super::{error::RelayError, relay::Relay};

enum RelayCommand {
    Connect {
        connection_id: ConnectionId,
        sender: PusherChannel,
    },
    Update {
        connection_id: ConnectionId,
        state: SharedState,
    },
    Disconnect {
        connection_id: ConnectionId,
    },
    Snapshot {
        reply: oneshot::Sender<SharedState>,
    },
    Connections {
        reply: oneshot::Sender<Vec<ClientConnection>>,
    },
}

/// Runs a `Relay` on its own task
pub struct RelayDispatcher {
    relay: Relay,
    commands: mpsc::UnboundedReceiver<RelayCommand>,
}

impl RelayDispatcher {
    /// Spawn the dispatcher task.
    ///
    /// The task ends once every `RelayHandle` has been dropped.
    pub fn spawn(relay: Relay) -> (RelayHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            relay,
            commands: rx,
        };
        let task = tokio::spawn(dispatcher.run());
        (RelayHandle { commands: tx }, task)
    }

    async fn run(mut self) {
        tracing::debug!("Relay dispatcher started");
        while let Some(command) = self.commands.recv().await {
            match command {
                RelayCommand::Connect {
                    connection_id,
                    sender,
                } => self.relay.on_connect(connection_id, sender).await,
                RelayCommand::Update {
                    connection_id,
                    state,
                } => self.relay.on_update(&connection_id, state).await,
                RelayCommand::Disconnect { connection_id } => {
                    self.relay.on_disconnect(&connection_id).await
                }
                RelayCommand::Snapshot { reply } => {
                    // The caller may have given up waiting
                    let _ = reply.send(self.relay.snapshot());
                }
                RelayCommand::Connections { reply } => {
                    let _ = reply.send(self.relay.connections().await);
                }
            }
        }
        tracing::debug!("Relay dispatcher stopped");
    }
}

/// Cloneable entry point to the relay dispatcher.
///
/// `connect`, `update` and `disconnect` are fire-and-forget: they enqueue the
/// event and return without waiting for it to be handled.
#[derive(Clone)]
pub struct RelayHandle {
    commands: mpsc::UnboundedSender<RelayCommand>,
}

impl RelayHandle {
    pub fn connect(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), RelayError> {
        self.send(RelayCommand::Connect {
            connection_id,
            sender,
        })
    }

    pub fn update(&self, connection_id: ConnectionId, state: SharedState) -> Result<(), RelayError> {
        self.send(RelayCommand::Update {
            connection_id,
            state,
        })
    }

    pub fn disconnect(&self, connection_id: ConnectionId) -> Result<(), RelayError> {
        self.send(RelayCommand::Disconnect { connection_id })
    }

    /// Current state, read after every event queued before this call
    pub async fn snapshot(&self) -> Result<SharedState, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(RelayCommand::Snapshot { reply })?;
        rx.await.map_err(|_| RelayError::Closed)
    }

    pub async fn connections(&self) -> Result<Vec<ClientConnection>, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(RelayCommand::Connections { reply })?;
        rx.await.map_err(|_| RelayError::Closed)
    }

    fn send(&self, command: RelayCommand) -> Result<(), RelayError> {
        self.commands.send(command).map_err(|_| RelayError::Closed)
    }
}
