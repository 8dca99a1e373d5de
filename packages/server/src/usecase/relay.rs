//! UseCase: 状態の中継（接続・更新・切断）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - Relay::on_connect / on_update / on_disconnect
//!
//! ### なぜこのテストが必要か
//! - 接続直後に現在の状態だけが本人に送られること
//! - 更新は全置換で、送信者を含む全接続にブロードキャストされること
//! - 切断では状態もブロードキャストも変化しないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続 → 更新 → 後から接続したクライアントへの同期
//! - エッジケース：オブジェクトでないペイロード、送信済みチャンネルの切断

use std::sync::Arc;

use akari_shared::time::Clock;

use crate::domain::{
    ClientConnection, ConnectionId, MessagePusher, Notification, PusherChannel, SharedState,
    Timestamp,
};

/// Owner of the shared state.
///
/// Methods take `&mut self`: the caller (the dispatcher) guarantees that one
/// event is handled to completion before the next starts.
pub struct Relay {
    state: SharedState,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl Relay {
    pub fn new(
        initial_state: SharedState,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: initial_state,
            message_pusher,
            clock,
        }
    }

    /// Register a connection and send it the current state.
    ///
    /// The state goes to the new connection only.
    pub async fn on_connect(&mut self, connection_id: ConnectionId, sender: PusherChannel) {
        let connected_at = Timestamp::new(self.clock.now_millis());
        self.message_pusher
            .register_client(
                ClientConnection::new(connection_id.clone(), connected_at),
                sender,
            )
            .await;
        tracing::info!("Connection '{}' connected", connection_id);

        let notification = Notification::InitialState(self.state.clone());
        if let Err(e) = self
            .message_pusher
            .push_to(&connection_id, &notification)
            .await
        {
            tracing::warn!(
                "Failed to send initial state to '{}': {}",
                connection_id,
                e
            );
        }
    }

    /// Replace the state wholesale and broadcast it to every connection,
    /// the sender included.
    pub async fn on_update(&mut self, connection_id: &ConnectionId, new_state: SharedState) {
        tracing::info!(
            "Received room update from '{}': {}",
            connection_id,
            new_state.as_value()
        );
        self.state = new_state;

        let notification = Notification::RoomUpdate(self.state.clone());
        match self.message_pusher.broadcast(&notification).await {
            Ok(delivered) => {
                tracing::debug!("Broadcasted room update to {} connections", delivered)
            }
            Err(e) => tracing::warn!("Failed to broadcast room update: {}", e),
        }
    }

    /// Forget a connection. The state is left as is and nothing is sent.
    pub async fn on_disconnect(&mut self, connection_id: &ConnectionId) {
        self.message_pusher.unregister_client(connection_id).await;
        tracing::info!("Connection '{}' disconnected", connection_id);
    }

    pub fn snapshot(&self) -> SharedState {
        self.state.clone()
    }

    pub async fn connections(&self) -> Vec<ClientConnection> {
        self.message_pusher.connections().await
    }
}
