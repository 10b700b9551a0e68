//! Rodio-based reply player
//!
//! Fetches the synthesized reply audio from its locator and plays it on
//! the default output device. The backend's TTS serves mp3; rodio's
//! decoder also handles wav and ogg, so the format is sniffed, not
//! assumed.

use std::io::Cursor;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};

use crate::application::ports::{PlaybackError, ReplyPlayer};

/// Reply player implementation using rodio
pub struct RodioReplyPlayer {
    client: reqwest::Client,
}

impl RodioReplyPlayer {
    /// Create a new rodio-based reply player
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for RodioReplyPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplyPlayer for RodioReplyPlayer {
    async fn play(&self, url: &str) -> Result<(), PlaybackError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlaybackError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PlaybackError::FetchFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PlaybackError::FetchFailed(e.to_string()))?
            .to_vec();

        // Decode and play in a blocking thread to keep the runtime free
        tokio::task::spawn_blocking(move || play_bytes_sync(bytes))
            .await
            .map_err(|e| PlaybackError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

/// Play a decoded audio buffer synchronously (called from spawn_blocking)
fn play_bytes_sync(bytes: Vec<u8>) -> Result<(), PlaybackError> {
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;

    let sink =
        Sink::try_new(&stream_handle).map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

    let source =
        Decoder::new(Cursor::new(bytes)).map_err(|e| PlaybackError::DecodeFailed(e.to_string()))?;

    sink.append(source);
    sink.sleep_until_end();

    Ok(())
}
