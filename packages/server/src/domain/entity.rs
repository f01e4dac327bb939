//! Room, member and message entities.

use serde::Serialize;
use thiserror::Error;

use super::value_object::{ClientId, RoomId, Timestamp};

/// Errors raised by room mutations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("client '{0}' is already a member of the room")]
    DuplicateMember(String),
}

/// A connected member of a room.
///
/// Holds presentation data only; the member's transport channel lives in the
/// message pusher so the room never outlives or owns a connection.
#[derive(Debug, Clone, Serialize)]
pub struct Member {
    pub client_id: ClientId,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub joined_at: Timestamp,
}

impl Member {
    /// Create a member with the default placeholder name
    pub fn guest(client_id: ClientId, joined_at: Timestamp) -> Self {
        Self::named(client_id, "Guest", joined_at)
    }

    /// Create a member with a caller-supplied display name (signaling joins)
    pub fn named(client_id: ClientId, display_name: impl Into<String>, joined_at: Timestamp) -> Self {
        Self {
            client_id,
            display_name: display_name.into(),
            avatar: None,
            joined_at,
        }
    }
}

/// A buffered chat message, immutable once appended.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub client_id: ClientId,
    pub sender: String,
    pub text: String,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(
        client_id: ClientId,
        sender: impl Into<String>,
        text: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            client_id,
            sender: sender.into(),
            text: text.into(),
            timestamp,
        }
    }
}

/// A named group of members sharing broadcast and signaling scope.
///
/// Members are kept in registration order (broadcast order). The message
/// history is append-only and unbounded, mirroring the observed behavior of
/// the original service.
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub members: Vec<Member>,
    pub messages: Vec<ChatMessage>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            members: Vec::new(),
            messages: Vec::new(),
            created_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Add a member; duplicate client ids are rejected.
    pub fn add_member(&mut self, member: Member) -> Result<(), RoomError> {
        if self.find_member(&member.client_id).is_some() {
            return Err(RoomError::DuplicateMember(
                member.client_id.as_str().to_string(),
            ));
        }
        self.members.push(member);
        Ok(())
    }

    /// Remove a member, returning it if present. Removing an absent member is
    /// a no-op, which keeps the disconnect path idempotent.
    pub fn remove_member(&mut self, client_id: &ClientId) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| &m.client_id == client_id)?;
        Some(self.members.remove(index))
    }

    pub fn find_member(&self, client_id: &ClientId) -> Option<&Member> {
        self.members.iter().find(|m| &m.client_id == client_id)
    }

    pub fn find_member_mut(&mut self, client_id: &ClientId) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| &m.client_id == client_id)
    }

    /// Resolve a signaling target by display name first, then by client id.
    pub fn resolve_member(&self, target: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.display_name == target)
            .or_else(|| self.members.iter().find(|m| m.client_id.as_str() == target))
    }

    pub fn append_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

/// Read-only room snapshot for the debug endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub members: Vec<String>,
    pub message_count: usize,
    pub created_at: Timestamp,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            members: room
                .members
                .iter()
                .map(|m| m.display_name.clone())
                .collect(),
            message_count: room.messages.len(),
            created_at: room.created_at,
        }
    }
}
