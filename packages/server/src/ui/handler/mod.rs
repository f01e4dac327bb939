//! WebSocket and HTTP endpoint handlers.

mod http;
mod signaling;
mod websocket;

pub use http::{debug_rooms, health_check, new_session, session_active, stt, tts};
pub use signaling::signaling_ws_handler;
pub use websocket::chat_ws_handler;
