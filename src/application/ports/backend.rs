//! Agent backend port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::AudioData;
use crate::domain::chat::{ExchangeReply, SessionId};

/// Exchange errors
#[derive(Debug, Clone, Error)]
pub enum ExchangeError {
    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Backend request failed: HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to parse backend response: {0}")]
    Parse(String),
}

/// Port for one audio-for-reply exchange with the agent backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Upload one audio payload and return the backend's reply.
    ///
    /// # Arguments
    /// * `audio` - The assembled capture payload
    /// * `session` - The conversation this exchange belongs to
    ///
    /// # Returns
    /// The parsed reply body or an error. A reply carrying an `error`
    /// field parses successfully; application errors are the caller's
    /// concern, not a transport failure.
    async fn exchange(
        &self,
        audio: &AudioData,
        session: &SessionId,
    ) -> Result<ExchangeReply, ExchangeError>;
}
