//! WebSocket-backed `MessagePusher` implementation.
//!
//! WebSocket connections are accepted in the UI layer, which registers each
//! client's `UnboundedSender` here. This implementation only manages the
//! sender map and delivers serialized frames; it never touches the sockets.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientId, MessagePushError, MessagePusher, PusherChannel};

/// Client-id to sender-channel map behind a mutex.
pub struct WebSocketMessagePusher {
    clients: Mutex<HashMap<ClientId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", client_id.as_str());
        clients.insert(client_id, sender);
    }

    async fn unregister_client(&self, client_id: &ClientId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(client_id).is_some() {
            tracing::debug!(
                "Client '{}' unregistered from MessagePusher",
                client_id.as_str()
            );
        }
    }

    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(client_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(client_id.as_str().to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|_| MessagePushError::PushFailed(client_id.as_str().to_string()))?;
        Ok(())
    }

    async fn broadcast(&self, targets: Vec<ClientId>, content: &str) -> usize {
        let clients = self.clients.lock().await;
        let mut delivered = 0;

        for target in targets {
            match clients.get(&target) {
                Some(sender) => {
                    // A closed channel means the connection is tearing down;
                    // skip it rather than fail the whole broadcast.
                    if sender.send(content.to_string()).is_err() {
                        tracing::warn!(
                            "Failed to push message to client '{}', skipping",
                            target.as_str()
                        );
                    } else {
                        delivered += 1;
                    }
                }
                None => {
                    tracing::warn!(
                        "Client '{}' not found during broadcast, skipping",
                        target.as_str()
                    );
                }
            }
        }

        delivered
    }
}
