//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use idobata_shared::time::millis_to_rfc3339;

use crate::infrastructure::dto::http::{
    ErrorDto, NewSessionDto, RoomSummaryDto, SessionActivityDto, TtsRequestDto,
};
use crate::infrastructure::openai::{SpeechError, TranscribeOptions};

use super::super::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Mint a session id for a client that wants to share a link before
/// connecting. The room is created on first WebSocket join.
pub async fn new_session(State(state): State<Arc<AppState>>) -> Json<NewSessionDto> {
    let session_id = state.session_status_usecase.new_session();
    Json(NewSessionDto {
        session_id: session_id.into_string(),
    })
}

/// Whether a session is live, and how many participants it has
pub async fn session_active(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<SessionActivityDto> {
    let activity = state.session_status_usecase.activity(&session_id).await;
    Json(SessionActivityDto {
        session_id: activity.session_id,
        active: activity.active,
        participants: activity.participants,
    })
}

/// Debug endpoint listing all live rooms (for manual inspection)
pub async fn debug_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let summaries = state.session_status_usecase.summaries().await;
    let dtos = summaries
        .into_iter()
        .map(|summary| RoomSummaryDto {
            id: summary.id.into_string(),
            members: summary.members,
            message_count: summary.message_count,
            created_at: millis_to_rfc3339(summary.created_at.value()),
        })
        .collect();
    Json(dtos)
}

/// Text-to-speech proxy endpoint
pub async fn tts(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TtsRequestDto>,
) -> Result<Response, (StatusCode, Json<ErrorDto>)> {
    let Some(text) = body.text.filter(|t| !t.is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorDto::new("No text provided")),
        ));
    };

    tracing::info!("Processing TTS request for text: \"{}\"", text);
    let audio = state
        .speech
        .synthesize(&text, body.voice.as_deref())
        .await
        .map_err(speech_error_response)?;
    tracing::info!("TTS response received: {} bytes of MP3 audio", audio.len());

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        audio,
    )
        .into_response())
}

/// Speech-to-text proxy endpoint. Expects a multipart body with a `file`
/// part plus optional `language`, `temperature` and `prompt` fields.
pub async fn stt(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<ErrorDto>)> {
    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut options = TranscribeOptions::default();

    while let Some(field) = multipart.next_field().await.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorDto::new("Invalid multipart body")),
        )
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .unwrap_or("recording.webm")
                    .to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|_| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorDto::new("Invalid multipart body")),
                    )
                })?;
                file = Some((data.to_vec(), mime_type, filename));
            }
            "language" => {
                if let Ok(value) = field.text().await {
                    options.language = value;
                }
            }
            "temperature" => {
                if let Ok(value) = field.text().await {
                    options.temperature = value.parse().unwrap_or(0.0);
                }
            }
            "prompt" => {
                if let Ok(value) = field.text().await {
                    options.prompt = Some(value);
                }
            }
            _ => {}
        }
    }

    let Some((data, mime_type, filename)) = file else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorDto::new("No audio file provided")),
        ));
    };

    tracing::info!("Processing STT request: {} bytes of audio data", data.len());
    let transcription = state
        .speech
        .transcribe(data, &mime_type, &filename, options)
        .await
        .map_err(speech_error_response)?;

    Ok(Json(transcription))
}

fn speech_error_response(error: SpeechError) -> (StatusCode, Json<ErrorDto>) {
    match error {
        SpeechError::MissingApiKey => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorDto::new(error.to_string())),
        ),
        SpeechError::Upstream { status, detail } => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorDto::with_detail(
                format!("OpenAI API returned {}", status),
                detail,
            )),
        ),
        SpeechError::Transport(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorDto::new(e.to_string())),
        ),
    }
}
