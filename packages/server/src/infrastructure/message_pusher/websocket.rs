//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を保持する（接続レジストリ）
//! - 通知を JSON にエンコードして送信する（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 実際のソケット書き込みは UI 層の pusher タスクが行うため、ここでは await しません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ClientConnection, ConnectionId, MessagePushError, MessagePusher, Notification,
        PusherChannel,
    },
    infrastructure::dto::websocket::RelayMessage,
};

struct RegisteredClient {
    connection: ClientConnection,
    sender: PusherChannel,
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection, tx).await;
/// pusher.broadcast(&Notification::RoomUpdate(state)).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアント
    ///
    /// Key: ConnectionId
    /// Value: 接続情報と送信チャンネル
    clients: Mutex<HashMap<ConnectionId, RegisteredClient>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(notification: &Notification) -> Result<String, MessagePushError> {
        RelayMessage::from(notification)
            .to_json()
            .map_err(|e| MessagePushError::Encode(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection: ClientConnection, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection.id);
        clients.insert(connection.id.clone(), RegisteredClient { connection, sender });
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let client = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        let frame = Self::encode(notification)?;
        client
            .sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);

        Ok(())
    }

    async fn broadcast(&self, notification: &Notification) -> Result<usize, MessagePushError> {
        let clients = self.clients.lock().await;
        let frame = Self::encode(notification)?;

        let mut delivered = 0;
        for (id, client) in clients.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = client.sender.send(frame.clone()) {
                tracing::warn!("Failed to push message to connection '{}': {}", id, e);
            } else {
                delivered += 1;
            }
        }
        tracing::debug!("Broadcasted message to {}/{} connections", delivered, clients.len());

        Ok(delivered)
    }

    async fn connections(&self) -> Vec<ClientConnection> {
        let clients = self.clients.lock().await;
        let mut connections: Vec<ClientConnection> = clients
            .values()
            .filter(|client| !client.sender.is_closed())
            .map(|client| client.connection.clone())
            .collect();
        connections.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        connections
    }
}
