//! Session registry interface.
//!
//! The domain layer defines the interface it needs from the data layer; the
//! infrastructure layer provides the concrete implementation (dependency
//! inversion). The registry is constructed once at process start and injected
//! into every usecase; there is no global room map.

use async_trait::async_trait;

use super::entity::{ChatMessage, Member, RoomError, RoomSummary};
use super::value_object::{ClientId, RoomId, Timestamp};

/// Registry of live rooms, keyed by room/session id.
///
/// A room exists iff it has at least one member (it is transiently empty only
/// inside a join operation). `remove` must be called when membership reaches
/// zero or the map grows without bound for one-shot rooms.
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Ensure a room exists for `room_id`, creating an empty one if needed.
    async fn get_or_create(&self, room_id: &RoomId, created_at: Timestamp);

    /// Delete the room entry. No-op if absent.
    async fn remove(&self, room_id: &RoomId);

    /// Whether a room currently exists
    async fn exists(&self, room_id: &RoomId) -> bool;

    /// Number of members in the room (0 if the room is absent)
    async fn member_count(&self, room_id: &RoomId) -> usize;

    /// Add a member to an existing room, returning a snapshot of the chat
    /// history taken in the same critical section as the insertion. A join
    /// therefore either fully precedes or fully follows any concurrent
    /// `append_message`: the message lands in the returned history or in the
    /// append's recipient list, never both.
    async fn add_member(
        &self,
        room_id: &RoomId,
        member: Member,
    ) -> Result<Vec<ChatMessage>, RoomError>;

    /// Remove a member, returning it if it was present. Idempotent.
    async fn remove_member(&self, room_id: &RoomId, client_id: &ClientId) -> Option<Member>;

    /// Snapshot of the room's members in registration order
    async fn members(&self, room_id: &RoomId) -> Vec<Member>;

    /// Current display name of a member
    async fn display_name(&self, room_id: &RoomId, client_id: &ClientId) -> Option<String>;

    /// Rename a member. Returns the old name only when the name actually
    /// changed; `None` for an absent member or an unchanged name.
    async fn rename_member(
        &self,
        room_id: &RoomId,
        client_id: &ClientId,
        new_name: &str,
    ) -> Option<String>;

    /// Store a member's avatar without any broadcast side effect
    async fn set_avatar(&self, room_id: &RoomId, client_id: &ClientId, avatar: String);

    /// Append a chat message to the room's history, returning the members to
    /// deliver it to (registration order), snapshotted in the same critical
    /// section as the append. Members joining after the append see the message
    /// in their history instead. Empty if the room is absent.
    async fn append_message(&self, room_id: &RoomId, message: ChatMessage) -> Vec<ClientId>;

    /// Snapshot of the room's buffered chat history, oldest first
    async fn history(&self, room_id: &RoomId) -> Vec<ChatMessage>;

    /// Resolve a signaling target by display name or client id
    async fn resolve_member(&self, room_id: &RoomId, target: &str) -> Option<ClientId>;

    /// Snapshots of all live rooms, for the debug endpoint
    async fn room_summaries(&self) -> Vec<RoomSummary>;
}
