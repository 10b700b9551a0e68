//! Reply audio playback port interface

use async_trait::async_trait;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Failed to fetch reply audio: {0}")]
    FetchFailed(String),

    #[error("Failed to decode reply audio: {0}")]
    DecodeFailed(String),

    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Port for playing the synthesized reply audio.
///
/// Playback is fire-and-forget from the caller's point of view: the use
/// case spawns it and never tracks completion.
#[async_trait]
pub trait ReplyPlayer: Send + Sync {
    /// Fetch and play the audio at `url` to completion.
    async fn play(&self, url: &str) -> Result<(), PlaybackError>;
}
