//! Voice exchange use case

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::capture::{
    AudioData, CaptureSession, CaptureState, Duration, InvalidStateTransition,
};
use crate::domain::chat::{ExchangeReply, SessionId};

use super::ports::{
    AudioCue, AudioCueType, CaptureStream, ChatBackend, ExchangeError, NotificationIcon, Notifier,
    PlaybackError, RecordingError, ReplyPlayer,
};

/// Errors from the voice exchange use case
#[derive(Debug, Error)]
pub enum VoiceExchangeError {
    #[error("{0}")]
    Recording(#[from] RecordingError),

    #[error("{0}")]
    Exchange(#[from] ExchangeError),

    #[error("{0}")]
    InvalidState(#[from] InvalidStateTransition),
}

/// Configuration for the voice exchange use case
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Conversation this client speaks into
    pub session_id: SessionId,
    /// Maximum capture duration (safety limit)
    pub max_duration: Duration,
    /// Whether to show desktop notifications
    pub enable_notify: bool,
    /// Whether to play the synthesized reply audio
    pub enable_playback: bool,
    /// Whether to play capture start/stop cues
    pub enable_cues: bool,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            session_id: SessionId::default(),
            max_duration: Duration::default_max_capture(),
            enable_notify: false,
            enable_playback: true,
            enable_cues: true,
        }
    }
}

/// Voice exchange use case.
///
/// Owns the capture state machine and mediates between the capture stream,
/// the agent backend, and reply playback. Begin/end are the only two
/// user-facing operations; the state guard makes a second begin while
/// capturing (or a stray end while idle) a rejected call rather than a
/// race. Ending a capture returns the payload and flips to idle
/// immediately; the caller runs `exchange` afterwards, typically on a
/// spawned task so the next capture is not blocked.
pub struct VoiceExchange<R, B, P, A, N>
where
    R: CaptureStream,
    B: ChatBackend,
    P: ReplyPlayer + 'static,
    A: AudioCue,
    N: Notifier,
{
    recorder: R,
    backend: B,
    player: Arc<P>,
    cue: A,
    notifier: N,
    session: Arc<Mutex<CaptureSession>>,
    config: ExchangeConfig,
}

impl<R, B, P, A, N> VoiceExchange<R, B, P, A, N>
where
    R: CaptureStream,
    B: ChatBackend,
    P: ReplyPlayer + 'static,
    A: AudioCue,
    N: Notifier,
{
    /// Create a new use case instance
    pub fn new(
        recorder: R,
        backend: B,
        player: P,
        cue: A,
        notifier: N,
        config: ExchangeConfig,
    ) -> Self {
        Self {
            recorder,
            backend,
            player: Arc::new(player),
            cue,
            notifier,
            session: Arc::new(Mutex::new(CaptureSession::new())),
            config,
        }
    }

    /// Get the current capture state
    pub async fn state(&self) -> CaptureState {
        self.session.lock().await.state()
    }

    /// Begin a capture.
    ///
    /// Rejected unless the state is idle. If the microphone cannot be
    /// opened the state rolls back to idle, so a capability error never
    /// leaves the session stuck in capturing.
    pub async fn begin_capture(&self) -> Result<(), VoiceExchangeError> {
        {
            let mut session = self.session.lock().await;
            session.begin()?;
        }

        if let Err(e) = self.recorder.start().await {
            let mut session = self.session.lock().await;
            let _ = session.cancel();
            return Err(e.into());
        }

        if self.config.enable_cues {
            let _ = self.cue.play(AudioCueType::CaptureStart).await;
        }

        if self.config.enable_notify {
            let _ = self
                .notifier
                .notify("VoiceLoop", "Listening...", NotificationIcon::Recording)
                .await;
        }

        Ok(())
    }

    /// End the capture and return the assembled payload.
    ///
    /// The state flips to idle synchronously; the exchange itself is the
    /// caller's next step and runs without holding any session state.
    pub async fn end_capture(&self) -> Result<AudioData, VoiceExchangeError> {
        {
            let mut session = self.session.lock().await;
            session.end()?;
        }

        if self.config.enable_cues {
            let _ = self.cue.play(AudioCueType::CaptureStop).await;
        }

        let audio = self.recorder.stop().await?;
        Ok(audio)
    }

    /// Cancel the capture without producing a payload
    pub async fn cancel(&self) -> Result<(), VoiceExchangeError> {
        {
            let mut session = self.session.lock().await;
            session.cancel()?;
        }

        self.recorder.cancel().await?;

        if self.config.enable_cues {
            let _ = self.cue.play(AudioCueType::CaptureCancel).await;
        }

        Ok(())
    }

    /// Upload one payload and return the backend's reply.
    ///
    /// No retry and no timeout: a transport failure is terminal for the
    /// turn. A reply carrying an `error` field is returned as Ok; the
    /// caller renders it as an application error.
    pub async fn exchange(&self, audio: AudioData) -> Result<ExchangeReply, VoiceExchangeError> {
        let reply = self
            .backend
            .exchange(&audio, &self.config.session_id)
            .await?;

        if self.config.enable_notify && !reply.is_error() {
            let _ = self
                .notifier
                .notify("VoiceLoop", "Reply received", NotificationIcon::Reply)
                .await;
        }

        Ok(reply)
    }

    /// Start fire-and-forget playback of the reply audio.
    ///
    /// Completion is not tracked; a playback failure is reported as a
    /// warning and never affects the turn.
    pub fn play_reply(&self, url: &str) {
        if !self.config.enable_playback {
            return;
        }

        let player = Arc::clone(&self.player);
        let url = url.to_string();
        tokio::spawn(async move {
            if let Err(e) = player.play(&url).await {
                match e {
                    PlaybackError::DeviceNotAvailable(_) => {
                        eprintln!("Warning: no audio output device, skipping reply playback");
                    }
                    e => eprintln!("Warning: reply playback failed: {}", e),
                }
            }
        });
    }

    /// Check if the capture has exceeded the max duration
    pub fn check_max_duration(&self) -> bool {
        self.recorder.elapsed_ms() >= self.config.max_duration.as_millis()
    }

    /// Get elapsed capture time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.recorder.elapsed_ms()
    }

    /// Check if the capture stream is open
    pub fn is_capturing(&self) -> bool {
        self.recorder.is_capturing()
    }

    /// The conversation this client speaks into
    pub fn session_id(&self) -> &SessionId {
        &self.config.session_id
    }
}
