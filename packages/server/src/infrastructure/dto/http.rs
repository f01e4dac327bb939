//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `GET /api/chat/new-session` response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionDto {
    pub session_id: String,
}

/// `GET /api/chat/session/{id}/active` response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionActivityDto {
    pub session_id: String,
    pub active: bool,
    pub participants: usize,
}

/// One room in the `GET /debug/rooms` listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub members: Vec<String>,
    pub message_count: usize,
    pub created_at: String,
}

/// `POST /api/tts` request body
#[derive(Debug, Deserialize)]
pub struct TtsRequestDto {
    pub text: Option<String>,
    pub voice: Option<String>,
}

/// Error body for the proxy endpoints
#[derive(Debug, Serialize)]
pub struct ErrorDto {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorDto {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: Some(detail.into()),
        }
    }
}
