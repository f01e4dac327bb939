//! UseCase: member departure and room teardown.

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, RoomId, RoomRegistry};

/// What the handler needs to know after a member left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Display name at the time of leaving
    pub display_name: String,
    /// Members remaining in the room after the removal
    pub remaining: usize,
}

impl Departure {
    /// The chat-side system notice for this departure
    pub fn notice(&self) -> String {
        format!("{} left the chat", self.display_name)
    }
}

/// Removes a member on transport close, error or an explicit leave; all
/// three take the same path. Removal is idempotent, and the room is deleted
/// the instant its membership reaches zero.
pub struct DisconnectUseCase {
    registry: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { registry, pusher }
    }

    pub async fn execute(&self, room_id: &RoomId, client_id: &ClientId) -> Option<Departure> {
        self.pusher.unregister_client(client_id).await;

        let removed = self.registry.remove_member(room_id, client_id).await?;
        let remaining = self.registry.member_count(room_id).await;

        tracing::info!(
            "Client {} ({}) left room {} ({} clients remaining)",
            client_id.as_str(),
            removed.display_name,
            room_id.as_str(),
            remaining
        );

        if remaining == 0 {
            self.registry.remove(room_id).await;
        }

        Some(Departure {
            display_name: removed.display_name,
            remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientIdFactory, Member, Timestamp};
    use crate::infrastructure::pusher::WebSocketMessagePusher;
    use crate::infrastructure::registry::InMemoryRoomRegistry;
    use tokio::sync::mpsc;

    async fn setup() -> (
        Arc<InMemoryRoomRegistry>,
        Arc<WebSocketMessagePusher>,
        DisconnectUseCase,
        RoomId,
    ) {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectUseCase::new(registry.clone(), pusher.clone());
        let room_id = RoomId::new("12345678").unwrap();
        registry.get_or_create(&room_id, Timestamp::new(1000)).await;
        (registry, pusher, usecase, room_id)
    }

    async fn join(
        registry: &InMemoryRoomRegistry,
        pusher: &WebSocketMessagePusher,
        room_id: &RoomId,
    ) -> ClientId {
        let client_id = ClientIdFactory::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry
            .add_member(room_id, Member::guest(client_id.clone(), Timestamp::new(1000)))
            .await
            .unwrap();
        pusher.register_client(client_id.clone(), tx).await;
        client_id
    }

    #[tokio::test]
    async fn test_departure_reports_name_and_remaining() {
        // given:
        let (registry, pusher, usecase, room_id) = setup().await;
        let a = join(&registry, &pusher, &room_id).await;
        let _b = join(&registry, &pusher, &room_id).await;

        // when:
        let departure = usecase.execute(&room_id, &a).await.unwrap();

        // then:
        assert_eq!(departure.display_name, "Guest");
        assert_eq!(departure.remaining, 1);
        assert_eq!(departure.notice(), "Guest left the chat");
        assert!(registry.exists(&room_id).await);
    }

    #[tokio::test]
    async fn test_last_departure_deletes_the_room() {
        // given:
        let (registry, pusher, usecase, room_id) = setup().await;
        let a = join(&registry, &pusher, &room_id).await;

        // when:
        let departure = usecase.execute(&room_id, &a).await.unwrap();

        // then:
        assert_eq!(departure.remaining, 0);
        assert!(!registry.exists(&room_id).await);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        // given:
        let (registry, pusher, usecase, room_id) = setup().await;
        let a = join(&registry, &pusher, &room_id).await;
        usecase.execute(&room_id, &a).await;

        // when: the close path runs again for the same client
        let second = usecase.execute(&room_id, &a).await;

        // then: removing an absent member is a no-op, not an error
        assert!(second.is_none());
    }
}
