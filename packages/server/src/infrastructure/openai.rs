//! OpenAI speech API gateway (external collaborator).
//!
//! Thin proxy client for text-to-speech and speech-to-text. The relay core
//! never depends on this module; failures here surface only as HTTP error
//! statuses on the proxy endpoints. No request timeout is enforced, matching
//! the observed behavior of the original service.

use serde_json::{json, Value};
use thiserror::Error;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const TTS_MODEL: &str = "tts-1";
const STT_MODEL: &str = "whisper-1";
const DEFAULT_VOICE: &str = "alloy";

/// Errors surfaced by the speech proxy
#[derive(Debug, Error)]
pub enum SpeechError {
    /// `OPENAI_API_KEY` was not set at startup
    #[error("OpenAI API key not set. Please set the OPENAI_API_KEY environment variable.")]
    MissingApiKey,

    /// The upstream API answered with a non-success status
    #[error("OpenAI API returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    /// Transport-level failure talking to the upstream API
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Options for a transcription request
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    pub language: String,
    pub temperature: f32,
    pub prompt: Option<String>,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            temperature: 0.0,
            prompt: None,
        }
    }
}

/// HTTP client for the OpenAI speech endpoints.
pub struct OpenAiSpeechGateway {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiSpeechGateway {
    /// Build a gateway reading `OPENAI_API_KEY` from the environment. A
    /// missing key degrades only the proxy endpoints, not the relay core.
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!(
                "OPENAI_API_KEY is not set; /api/tts and /api/stt will answer 503"
            );
        }
        Self::new(api_key, OPENAI_API_BASE)
    }

    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: base_url.into(),
        }
    }

    fn api_key(&self) -> Result<&str, SpeechError> {
        self.api_key.as_deref().ok_or(SpeechError::MissingApiKey)
    }

    /// Synthesize `text` to MP3 bytes via the `tts-1` model.
    pub async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, SpeechError> {
        let key = self.api_key()?;
        let response = self
            .http
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(key)
            .json(&json!({
                "model": TTS_MODEL,
                "input": text,
                "voice": voice.unwrap_or(DEFAULT_VOICE),
                "response_format": "mp3",
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Upstream {
                status: status.as_u16(),
                detail: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Transcribe an uploaded audio blob via the `whisper-1` model, returning
    /// the upstream JSON verbatim.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        mime_type: &str,
        filename: &str,
        options: TranscribeOptions,
    ) -> Result<Value, SpeechError> {
        let key = self.api_key()?;

        let file_part = reqwest::multipart::Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str(mime_type)?;
        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", STT_MODEL)
            .text("language", options.language)
            .text("temperature", options.temperature.to_string());
        if let Some(prompt) = options.prompt {
            form = form.text("prompt", prompt);
        }

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Upstream {
                status: status.as_u16(),
                detail: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_synthesize_without_api_key_fails_fast() {
        // given:
        let gateway = OpenAiSpeechGateway::new(None, "http://127.0.0.1:0");

        // when:
        let result = gateway.synthesize("hello", None).await;

        // then: no request is attempted
        assert!(matches!(result, Err(SpeechError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_transcribe_without_api_key_fails_fast() {
        // given:
        let gateway = OpenAiSpeechGateway::new(None, "http://127.0.0.1:0");

        // when:
        let result = gateway
            .transcribe(vec![0u8; 4], "audio/webm", "recording.webm", TranscribeOptions::default())
            .await;

        // then:
        assert!(matches!(result, Err(SpeechError::MissingApiKey)));
    }

    #[test]
    fn test_default_transcribe_options() {
        // given / when:
        let options = TranscribeOptions::default();

        // then: defaults match the original proxy's form fields
        assert_eq!(options.language, "en");
        assert_eq!(options.temperature, 0.0);
        assert!(options.prompt.is_none());
    }
}
