//! Client execution logic with reconnection support.

use std::time::Duration;

use tokio::sync::mpsc;

use super::{error::ClientError, session::run_client_session};

/// How often and how quickly the client retries an unreachable server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Consecutive failed connection attempts before giving up
    pub max_attempts: u32,
    /// Wait between attempts
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(5),
        }
    }
}

/// Run the WebSocket client with reconnection logic
///
/// Only consecutive failures count toward `policy.max_attempts`. A session
/// that connected and later lost its connection starts the count again.
pub async fn run_client(
    url: &str,
    policy: ReconnectPolicy,
    mut input: mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let mut failed_attempts = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            failed_attempts + 1,
            policy.max_attempts
        );

        match run_client_session(url, &mut input).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                return Ok(());
            }
            Err(ClientError::ConnectionLost) => {
                tracing::warn!("Connection lost");
                failed_attempts = 0;
            }
            Err(e) => {
                tracing::warn!("Failed to connect: {}", e);
                failed_attempts += 1;

                if failed_attempts >= policy.max_attempts {
                    return Err(ClientError::Connection(format!(
                        "failed to reconnect after {} attempts",
                        policy.max_attempts
                    )));
                }
            }
        }

        tracing::info!(
            "Reconnecting in {:?}... (attempt {}/{})",
            policy.interval,
            failed_attempts + 1,
            policy.max_attempts
        );

        tokio::time::sleep(policy.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        // テスト項目: 既定の再接続ポリシーは 5 回、5 秒間隔
        // given (前提条件):

        // when (操作):
        let policy = ReconnectPolicy::default();

        // then (期待する結果):
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.interval, Duration::from_secs(5));
    }
}
