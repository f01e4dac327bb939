//! UseCase: WebRTC signaling (name-keyed joins, point-to-point relay).

use std::sync::Arc;

use idobata_shared::time::now_millis;

use crate::domain::{
    ClientId, ClientIdFactory, Member, MessagePusher, PusherChannel, RoomId, RoomRegistry,
    Timestamp,
};

use super::error::JoinError;

/// Signaling rooms are joined with a caller-supplied room name and user name.
/// Offer/answer/ICE-candidate envelopes are routed to exactly one named
/// target; a missing target means the envelope is dropped silently, with no
/// retry and no buffering for targets that have not joined yet.
pub struct SignalingUseCase {
    registry: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl SignalingUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { registry, pusher }
    }

    /// Join a signaling room under a user name. Returns the generated client
    /// id the connection is tracked by.
    pub async fn join(
        &self,
        room_name: String,
        user: String,
        channel: PusherChannel,
    ) -> Result<(RoomId, ClientId), JoinError> {
        let room_id = RoomId::new(room_name)?;
        let client_id = ClientIdFactory::generate();
        let joined_at = Timestamp::new(now_millis());

        // Channel first, so the member is deliverable as soon as it is visible
        // to concurrent relays and broadcasts.
        self.pusher.register_client(client_id.clone(), channel).await;
        self.registry.get_or_create(&room_id, joined_at).await;
        if let Err(e) = self
            .registry
            .add_member(&room_id, Member::named(client_id.clone(), user.clone(), joined_at))
            .await
        {
            self.pusher.unregister_client(&client_id).await;
            return Err(e.into());
        }

        tracing::info!("User {} joined room {}", user, room_id.as_str());
        Ok((room_id, client_id))
    }

    /// Route a serialized envelope to the named target. Delivers to exactly
    /// 0 or 1 recipients; returns whether delivery happened.
    pub async fn relay(&self, room_id: &RoomId, target: &str, payload: &str) -> bool {
        let Some(target_id) = self.registry.resolve_member(room_id, target).await else {
            tracing::debug!(
                "Signaling target '{}' not found in room '{}', dropping",
                target,
                room_id.as_str()
            );
            return false;
        };

        match self.pusher.push_to(&target_id, payload).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Signaling relay to '{}' failed: {}", target, e);
                false
            }
        }
    }
}
