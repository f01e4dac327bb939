//! Value objects for room and client identity.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Number of digits in a generated chat session id
pub const SESSION_ID_LENGTH: usize = 8;

/// Validation errors for identity value objects
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("room id must not be empty")]
    EmptyRoomId,
    #[error("client id must not be empty")]
    EmptyClientId,
}

/// Opaque room/session identifier.
///
/// Either a generated 8-digit numeric session id or a caller-supplied room name
/// (signaling rooms). Treated as a unique key into the registry; uniqueness of
/// generated ids is by chance only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::EmptyRoomId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Factory for generated chat session ids
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a random numeric session id from independent draws of `[0-9]`.
    ///
    /// Not guaranteed collision-free; colliding clients simply land in the same
    /// room, which is the accepted rendezvous semantics.
    pub fn generate() -> RoomId {
        let mut rng = rand::thread_rng();
        let digits: String = (0..SESSION_ID_LENGTH)
            .map(|_| char::from(b'0' + rng.gen_range(0..10)))
            .collect();
        RoomId(digits)
    }
}

/// Opaque client identifier, unique within a process run and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::EmptyClientId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Factory for connection-time client ids
pub struct ClientIdFactory;

impl ClientIdFactory {
    /// Generate a fresh random client id (UUID v4)
    pub fn generate() -> ClientId {
        ClientId(Uuid::new_v4().to_string())
    }
}

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_rejects_empty_input() {
        // given:
        let inputs = ["", "   "];

        // when / then:
        for input in inputs {
            assert_eq!(RoomId::new(input), Err(DomainError::EmptyRoomId));
        }
    }

    #[test]
    fn test_room_id_accepts_caller_supplied_name() {
        // given:
        let input = "team-standup";

        // when:
        let room_id = RoomId::new(input).unwrap();

        // then:
        assert_eq!(room_id.as_str(), "team-standup");
    }

    #[test]
    fn test_generated_session_id_is_eight_digits() {
        // given / when:
        let room_id = RoomIdFactory::generate();

        // then:
        assert_eq!(room_id.as_str().len(), SESSION_ID_LENGTH);
        assert!(room_id.as_str().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generated_session_ids_differ() {
        // given / when:
        let ids: Vec<RoomId> = (0..16).map(|_| RoomIdFactory::generate()).collect();

        // then: 16 draws from a 10^8 space colliding would point at a broken rng
        let first = &ids[0];
        assert!(ids.iter().any(|id| id != first) || ids.len() == 1);
    }

    #[test]
    fn test_client_id_rejects_empty_input() {
        // given / when / then:
        assert_eq!(ClientId::new(""), Err(DomainError::EmptyClientId));
    }

    #[test]
    fn test_generated_client_ids_are_unique() {
        // given / when:
        let a = ClientIdFactory::generate();
        let b = ClientIdFactory::generate();

        // then:
        assert_ne!(a, b);
    }

    #[test]
    fn test_timestamp_preserves_value() {
        // given / when:
        let ts = Timestamp::new(1672531200123);

        // then:
        assert_eq!(ts.value(), 1672531200123);
    }
}
