//! Server state and connection management.

use std::sync::Arc;

use serde::Deserialize;

use crate::infrastructure::openai::OpenAiSpeechGateway;
use crate::usecase::{
    BroadcastDispatcher, DisconnectUseCase, JoinSessionUseCase, SendMessageUseCase,
    SessionStatusUseCase, SignalingUseCase, UpdateProfileUseCase,
};

/// Query parameters for the chat WebSocket endpoint. A missing session id
/// makes the server generate one.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Shared application state
pub struct AppState {
    pub join_session_usecase: Arc<JoinSessionUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub update_profile_usecase: Arc<UpdateProfileUseCase>,
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub signaling_usecase: Arc<SignalingUseCase>,
    pub session_status_usecase: Arc<SessionStatusUseCase>,
    pub dispatcher: Arc<BroadcastDispatcher>,
    pub speech: Arc<OpenAiSpeechGateway>,
}
