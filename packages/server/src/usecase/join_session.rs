//! UseCase: joining a chat session.

use std::sync::Arc;

use idobata_shared::time::now_millis;

use crate::domain::{
    ChatMessage, ClientId, ClientIdFactory, Member, MessagePusher, PusherChannel, RoomId,
    RoomIdFactory, RoomRegistry, Timestamp,
};

use super::error::JoinError;

/// Result of a successful join
pub struct JoinOutcome {
    pub session_id: RoomId,
    pub client_id: ClientId,
    /// Buffered chat history snapshotted atomically with the member insertion,
    /// oldest first. Pushed to the joiner only. A message sent concurrently
    /// with the join arrives either here or via live delivery, never both.
    pub history: Vec<ChatMessage>,
}

/// Chat-session join: accepts a caller-supplied session id or mints an 8-digit
/// one, registers the member as "Guest" and wires up its outbound channel.
pub struct JoinSessionUseCase {
    registry: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl JoinSessionUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { registry, pusher }
    }

    pub async fn execute(
        &self,
        requested_session: Option<String>,
        channel: PusherChannel,
    ) -> Result<JoinOutcome, JoinError> {
        let session_id = match requested_session.filter(|s| !s.trim().is_empty()) {
            Some(raw) => RoomId::new(raw)?,
            None => {
                let generated = RoomIdFactory::generate();
                tracing::info!("Generated new session ID: {}", generated.as_str());
                generated
            }
        };

        let client_id = ClientIdFactory::generate();
        let joined_at = Timestamp::new(now_millis());

        // The channel must be registered before the member becomes visible:
        // the moment the insertion commits, a concurrent append lists this
        // member as a recipient and delivery must succeed.
        self.pusher.register_client(client_id.clone(), channel).await;
        self.registry.get_or_create(&session_id, joined_at).await;
        let history = match self
            .registry
            .add_member(&session_id, Member::guest(client_id.clone(), joined_at))
            .await
        {
            Ok(history) => history,
            Err(e) => {
                self.pusher.unregister_client(&client_id).await;
                return Err(e.into());
            }
        };

        tracing::info!(
            "Client {} joined room {} ({} clients)",
            client_id.as_str(),
            session_id.as_str(),
            self.registry.member_count(&session_id).await
        );

        Ok(JoinOutcome {
            session_id,
            client_id,
            history,
        })
    }
}
