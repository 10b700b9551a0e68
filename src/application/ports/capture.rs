//! Capture port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::AudioData;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("No audio captured")]
    EmptyCapture,

    #[error("Microphone access denied or unavailable")]
    NoAudioDevice,
}

impl RecordingError {
    /// Whether this error means the microphone itself is unusable,
    /// as opposed to a failure mid-capture.
    pub fn is_capability(&self) -> bool {
        matches!(self, Self::NoAudioDevice | Self::StartFailed(_))
    }
}

/// Port for toggle-controlled audio capture.
///
/// `start` opens the microphone stream and begins accumulating fragments;
/// `stop` closes it and returns the assembled payload. The fragment buffer
/// is reset on every `start` and only mutated while capture is active.
#[async_trait]
pub trait CaptureStream: Send + Sync {
    /// Open the capture stream and begin accumulating audio.
    async fn start(&self) -> Result<(), RecordingError>;

    /// Close the capture stream and return the assembled payload.
    async fn stop(&self) -> Result<AudioData, RecordingError>;

    /// Discard the capture without producing a payload.
    async fn cancel(&self) -> Result<(), RecordingError>;

    /// Check if currently capturing
    fn is_capturing(&self) -> bool;

    /// Get elapsed capture time in milliseconds
    fn elapsed_ms(&self) -> u64;
}
