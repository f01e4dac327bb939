//! UseCase error types.

use thiserror::Error;

use crate::domain::{DomainError, RoomError};

/// Errors raised while joining a room
#[derive(Debug, Error)]
pub enum JoinError {
    #[error("invalid room name: {0}")]
    InvalidRoomName(#[from] DomainError),

    #[error(transparent)]
    Room(#[from] RoomError),
}

/// Errors raised while sending a chat message
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendMessageError {
    /// The sender is not (or no longer) a member of the room; the frame is
    /// dropped without an answer, per the silent-drop policy.
    #[error("sender is not a member of room '{0}'")]
    SenderNotInRoom(String),
}
