//! Room-wide fan-out of pre-serialized frames.

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, RoomId, RoomRegistry};

/// Broadcast dispatcher: the caller serializes a frame exactly once, and the
/// dispatcher hands the same string to every member of the room in
/// registration order, optionally excluding the sender. Members whose channel
/// is no longer writable are skipped silently; not queued, not retried.
pub struct BroadcastDispatcher {
    registry: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl BroadcastDispatcher {
    pub fn new(registry: Arc<dyn RoomRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { registry, pusher }
    }

    /// Fan a serialized frame out to the room. Returns the number of members
    /// the frame was delivered to.
    pub async fn broadcast(
        &self,
        room_id: &RoomId,
        payload: &str,
        exclude: Option<&ClientId>,
    ) -> usize {
        let targets: Vec<ClientId> = self
            .registry
            .members(room_id)
            .await
            .into_iter()
            .map(|member| member.client_id)
            .filter(|client_id| exclude != Some(client_id))
            .collect();

        if targets.is_empty() {
            return 0;
        }

        let delivered = self.pusher.broadcast(targets, payload).await;
        tracing::debug!(
            "Broadcast to room '{}' delivered to {} member(s)",
            room_id.as_str(),
            delivered
        );
        delivered
    }

    /// Fan a serialized frame out to an explicit recipient set instead of the
    /// room's current membership. Used for chat delivery, where the recipients
    /// were snapshotted atomically with the history append so that a member
    /// joining mid-send replays the message from history rather than
    /// receiving it twice.
    pub async fn deliver(
        &self,
        room_id: &RoomId,
        recipients: Vec<ClientId>,
        payload: &str,
    ) -> usize {
        if recipients.is_empty() {
            return 0;
        }
        let delivered = self.pusher.broadcast(recipients, payload).await;
        tracing::debug!(
            "Delivery to room '{}' reached {} member(s)",
            room_id.as_str(),
            delivered
        );
        delivered
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
        BroadcastDispatcher,
        RoomId,
    ) {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let dispatcher = BroadcastDispatcher::new(registry.clone(), pusher.clone());
        let room_id = RoomId::new("12345678").unwrap();
        registry.get_or_create(&room_id, Timestamp::new(1000)).await;
        (registry, pusher, dispatcher, room_id)
    }

    async fn join(
        registry: &InMemoryRoomRegistry,
        pusher: &WebSocketMessagePusher,
        room_id: &RoomId,
    ) -> (ClientId, mpsc::UnboundedReceiver<String>) {
        let client_id = ClientIdFactory::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        registry
            .add_member(room_id, Member::guest(client_id.clone(), Timestamp::new(1000)))
            .await
            .unwrap();
        pusher.register_client(client_id.clone(), tx).await;
        (client_id, rx)
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_member() {
        // given:
        let (registry, pusher, dispatcher, room_id) = setup().await;
        let (_, mut rx_a) = join(&registry, &pusher, &room_id).await;
        let (_, mut rx_b) = join(&registry, &pusher, &room_id).await;
        let (_, mut rx_c) = join(&registry, &pusher, &room_id).await;

        // when:
        let delivered = dispatcher.broadcast(&room_id, "payload", None).await;

        // then: one identical payload each
        assert_eq!(delivered, 3);
        for rx in [&mut rx_a, &mut rx_b, &mut rx_c] {
            assert_eq!(rx.recv().await, Some("payload".to_string()));
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn test_broadcast_excludes_the_sender() {
        // given:
        let (registry, pusher, dispatcher, room_id) = setup().await;
        let (sender_id, mut rx_sender) = join(&registry, &pusher, &room_id).await;
        let (_, mut rx_other) = join(&registry, &pusher, &room_id).await;

        // when:
        let delivered = dispatcher
            .broadcast(&room_id, "payload", Some(&sender_id))
            .await;

        // then:
        assert_eq!(delivered, 1);
        assert!(rx_sender.try_recv().is_err());
        assert_eq!(rx_other.recv().await, Some("payload".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_member_without_error() {
        // given: B's connection is already gone
        let (registry, pusher, dispatcher, room_id) = setup().await;
        let (_, mut rx_a) = join(&registry, &pusher, &room_id).await;
        let (_, rx_b) = join(&registry, &pusher, &room_id).await;
        let (_, mut rx_c) = join(&registry, &pusher, &room_id).await;
        drop(rx_b);

        // when:
        let delivered = dispatcher.broadcast(&room_id, "payload", None).await;

        // then:
        assert_eq!(delivered, 2);
        assert_eq!(rx_a.recv().await, Some("payload".to_string()));
        assert_eq!(rx_c.recv().await, Some("payload".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_to_unknown_room_delivers_nothing() {
        // given:
        let (_, _, dispatcher, _) = setup().await;
        let unknown = RoomId::new("00000000").unwrap();

        // when / then:
        assert_eq!(dispatcher.broadcast(&unknown, "payload", None).await, 0);
    }

    #[tokio::test]
    async fn test_deliver_targets_the_given_recipients_only() {
        // given: a recipient snapshot taken before a third member joins
        let (registry, pusher, dispatcher, room_id) = setup().await;
        let (a_id, mut rx_a) = join(&registry, &pusher, &room_id).await;
        let (b_id, mut rx_b) = join(&registry, &pusher, &room_id).await;
        let recipients = vec![a_id, b_id];
        let (_, mut rx_late) = join(&registry, &pusher, &room_id).await;

        // when:
        let delivered = dispatcher.deliver(&room_id, recipients, "payload").await;

        // then: current membership is ignored, only the snapshot receives it
        assert_eq!(delivered, 2);
        assert_eq!(rx_a.recv().await, Some("payload".to_string()));
        assert_eq!(rx_b.recv().await, Some("payload".to_string()));
        assert!(rx_late.try_recv().is_err());
    }
}
