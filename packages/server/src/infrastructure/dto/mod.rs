//! Data Transfer Objects (DTOs), organized by protocol:
//! - `websocket`: chat/signaling wire envelopes
//! - `http`: HTTP API response DTOs

pub mod http;
pub mod websocket;
