//! Server execution logic.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handler::{
    chat_ws_handler, debug_rooms, health_check, new_session, session_active, signaling_ws_handler,
    stt, tts,
};
use super::signal::shutdown_signal;
use super::state::AppState;

/// Ephemeral chat & signaling relay server.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Run the relay server.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // The original clients are browser apps served from elsewhere, so the
        // API is wide open by design.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        let app = Router::new()
            // WebSocket endpoints
            .route("/ws", get(chat_ws_handler))
            .route("/webrtc", get(signaling_ws_handler))
            // HTTP endpoints
            .route("/api/health", get(health_check))
            .route("/api/chat/new-session", get(new_session))
            .route("/api/chat/session/{session_id}/active", get(session_active))
            .route("/debug/rooms", get(debug_rooms))
            // External collaborator proxy
            .route("/api/tts", post(tts))
            .route("/api/stt", post(stt))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Chat WebSocket: ws://{}/ws?sessionId=YOUR_SESSION_ID", bind_addr);
        tracing::info!("Signaling WebSocket: ws://{}/webrtc", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
