//! In-memory `RoomRegistry` implementation.
//!
//! A `HashMap` behind a `tokio::sync::Mutex` is the whole data store. Every
//! mutation takes the lock once, so membership changes are atomic relative to
//! concurrent connection tasks and no torn broadcasts can be observed.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ClientId, Member, Room, RoomError, RoomId, RoomRegistry, RoomSummary, Timestamp,
};

/// In-memory room registry. Process restart loses all rooms; this is accepted
/// behavior, not a defect.
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<RoomId, Room>>,
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn get_or_create(&self, room_id: &RoomId, created_at: Timestamp) {
        let mut rooms = self.rooms.lock().await;
        if !rooms.contains_key(room_id) {
            rooms.insert(room_id.clone(), Room::new(room_id.clone(), created_at));
            tracing::info!("Created new room '{}'", room_id.as_str());
        }
    }

    async fn remove(&self, room_id: &RoomId) {
        let mut rooms = self.rooms.lock().await;
        if rooms.remove(room_id).is_some() {
            tracing::info!(
                "Room '{}' is now empty, deleting room and all messages",
                room_id.as_str()
            );
        }
    }

    async fn exists(&self, room_id: &RoomId) -> bool {
        let rooms = self.rooms.lock().await;
        rooms.contains_key(room_id)
    }

    async fn member_count(&self, room_id: &RoomId) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).map_or(0, |room| room.member_count())
    }

    async fn add_member(
        &self,
        room_id: &RoomId,
        member: Member,
    ) -> Result<Vec<ChatMessage>, RoomError> {
        let mut rooms = self.rooms.lock().await;
        match rooms.get_mut(room_id) {
            Some(room) => {
                room.add_member(member)?;
                // Snapshot under the same lock as the insertion; a concurrent
                // append either already shows up here or will list this member
                // as a recipient.
                Ok(room.messages.clone())
            }
            // get_or_create runs first in every join path; a missing room here
            // means the caller skipped it, so recreate rather than fail.
            None => {
                let mut room = Room::new(room_id.clone(), member.joined_at);
                room.add_member(member)?;
                rooms.insert(room_id.clone(), room);
                Ok(Vec::new())
            }
        }
    }

    async fn remove_member(&self, room_id: &RoomId, client_id: &ClientId) -> Option<Member> {
        let mut rooms = self.rooms.lock().await;
        rooms.get_mut(room_id)?.remove_member(client_id)
    }

    async fn members(&self, room_id: &RoomId) -> Vec<Member> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map_or_else(Vec::new, |room| room.members.clone())
    }

    async fn display_name(&self, room_id: &RoomId, client_id: &ClientId) -> Option<String> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)?
            .find_member(client_id)
            .map(|m| m.display_name.clone())
    }

    async fn rename_member(
        &self,
        room_id: &RoomId,
        client_id: &ClientId,
        new_name: &str,
    ) -> Option<String> {
        let mut rooms = self.rooms.lock().await;
        let member = rooms.get_mut(room_id)?.find_member_mut(client_id)?;
        if member.display_name == new_name {
            return None;
        }
        let old_name = std::mem::replace(&mut member.display_name, new_name.to_string());
        Some(old_name)
    }

    async fn set_avatar(&self, room_id: &RoomId, client_id: &ClientId, avatar: String) {
        let mut rooms = self.rooms.lock().await;
        if let Some(member) = rooms
            .get_mut(room_id)
            .and_then(|room| room.find_member_mut(client_id))
        {
            member.avatar = Some(avatar);
        }
    }

    async fn append_message(&self, room_id: &RoomId, message: ChatMessage) -> Vec<ClientId> {
        let mut rooms = self.rooms.lock().await;
        match rooms.get_mut(room_id) {
            Some(room) => {
                room.append_message(message);
                room.members.iter().map(|m| m.client_id.clone()).collect()
            }
            None => Vec::new(),
        }
    }

    async fn history(&self, room_id: &RoomId) -> Vec<ChatMessage> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map_or_else(Vec::new, |room| room.messages.clone())
    }

    async fn resolve_member(&self, room_id: &RoomId, target: &str) -> Option<ClientId> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)?
            .resolve_member(target)
            .map(|m| m.client_id.clone())
    }

    async fn room_summaries(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.lock().await;
        let mut summaries: Vec<RoomSummary> = rooms.values().map(RoomSummary::from).collect();
        summaries.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        summaries
    }
}
