//! Ephemeral chat and WebRTC signaling relay server library.
//!
//! Rooms are in-memory only: they are created on first join, deleted the moment
//! the last member leaves, and lost entirely on process restart.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
