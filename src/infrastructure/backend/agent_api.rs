//! Agent chat API backend adapter
//!
//! Uploads the capture payload as multipart form data and parses the
//! JSON reply. No retry and no request timeout: a failed exchange is
//! terminal for the turn.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::application::ports::{ChatBackend, ExchangeError};
use crate::domain::capture::AudioData;
use crate::domain::chat::{ExchangeReply, SessionId};

/// Form field name carrying the audio payload
const AUDIO_FIELD: &str = "audio";

/// Agent chat API client
pub struct AgentApiBackend {
    base_url: String,
    client: reqwest::Client,
}

impl AgentApiBackend {
    /// Create a new backend client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the chat endpoint URL for a session
    fn chat_url(&self, session: &SessionId) -> String {
        format!(
            "{}/agent/chat/{}",
            self.base_url.trim_end_matches('/'),
            session
        )
    }

    /// Build the multipart form for one payload
    fn build_form(audio: &AudioData) -> Result<Form, ExchangeError> {
        let part = Part::bytes(audio.data().to_vec())
            .file_name(audio.file_name())
            .mime_str(audio.mime_type().as_str())
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        Ok(Form::new().part(AUDIO_FIELD, part))
    }
}

#[async_trait]
impl ChatBackend for AgentApiBackend {
    async fn exchange(
        &self,
        audio: &AudioData,
        session: &SessionId,
    ) -> Result<ExchangeReply, ExchangeError> {
        let url = self.chat_url(session);
        let form = Self::build_form(audio)?;

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        let status = response.status();

        // The backend reports application errors as JSON bodies, including
        // on 4xx; only fail here when the body is not a parseable reply.
        if status.is_success() || status.is_client_error() {
            let body = response
                .text()
                .await
                .map_err(|e| ExchangeError::Transport(e.to_string()))?;

            return serde_json::from_str(&body).map_err(|e| {
                if status.is_success() {
                    ExchangeError::Parse(e.to_string())
                } else {
                    ExchangeError::Http {
                        status: status.as_u16(),
                        body,
                    }
                }
            });
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(ExchangeError::Http {
            status: status.as_u16(),
            body,
        })
    }
}
