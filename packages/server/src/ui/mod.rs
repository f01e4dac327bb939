//! UI layer: axum server, shared state and the WebSocket/HTTP handlers.

pub mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
