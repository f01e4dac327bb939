//! Concrete `MessagePusher` implementations.

mod websocket;

pub use websocket::WebSocketMessagePusher;
