//! Message delivery interface.
//!
//! Connection handles never live in the room entities: the pusher owns the
//! per-client sender channels, so the registry and the transport can be torn
//! down independently.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ClientId;

/// Per-client outbound channel. A single send task per connection drains the
/// receiving end into the WebSocket, preserving frame order.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Errors raised by point-to-point pushes
#[derive(Debug, Error)]
pub enum MessagePushError {
    /// No channel registered for the client
    #[error("client '{0}' is not connected")]
    ClientNotFound(String),

    /// The client's channel is closed (connection going away)
    #[error("failed to push to client '{0}'")]
    PushFailed(String),
}

/// Best-effort delivery of serialized frames to connected clients.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a client's outbound channel
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel);

    /// Drop a client's outbound channel. Idempotent.
    async fn unregister_client(&self, client_id: &ClientId);

    /// Push one frame to one client
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError>;

    /// Push the same frame to every target whose channel is still open,
    /// silently skipping closed or unknown channels. Returns the number of
    /// clients the frame was handed to; dead receivers never raise.
    async fn broadcast(&self, targets: Vec<ClientId>, content: &str) -> usize;
}
