//! Interactive chat loop runner

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::application::ports::{
    AudioCue, CaptureStream, ChatBackend, ConfigStore, Notifier, RecordingError, ReplyPlayer,
};
use crate::application::{ExchangeConfig, VoiceExchange, VoiceExchangeError};
use crate::domain::capture::{CaptureState, Duration};
use crate::domain::chat::{ChatLog, ExchangeReply, Sender, SessionId};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    AgentApiBackend, CpalCapture, DesktopNotifier, RodioAudioCue, RodioReplyPlayer, XdgConfigStore,
};

use super::presenter::{sanitize, Presenter};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Status texts for the chat loop
const STATUS_FIRST_PROMPT: &str = "Press Enter to talk.";
const STATUS_RECORDING: &str = "Recording... Speak now!";
const STATUS_PROCESSING: &str = "Processing your audio...";
const STATUS_IDLE_PROMPT: &str = "Press Enter to talk again.";
const STATUS_MIC_ERROR: &str = "Microphone access denied or unavailable.";
const STATUS_CONNECTION_ERROR: &str = "Connection error. Try again.";

/// Parsed chat options
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub server_url: String,
    pub session_id: SessionId,
    pub max_duration: Duration,
    pub notify: bool,
    pub playback: bool,
    pub cues: bool,
}

/// One completed exchange, delivered back to the chat loop.
///
/// Spawned upload tasks never touch the log or the status surface
/// directly; everything funnels through this event so UI updates stay
/// serialized even when exchanges overlap.
type ExchangeOutcome = Result<ExchangeReply, VoiceExchangeError>;

/// Run the interactive chat loop
pub async fn run_chat(options: ChatOptions) -> ExitCode {
    let recorder = CpalCapture::new();
    let backend = AgentApiBackend::new(options.server_url.as_str());
    let player = RodioReplyPlayer::new();
    let cue = RodioAudioCue::new();
    let notifier = DesktopNotifier::new();

    let config = ExchangeConfig {
        session_id: options.session_id.clone(),
        max_duration: options.max_duration,
        enable_notify: options.notify,
        enable_playback: options.playback,
        enable_cues: options.cues,
    };

    let use_case = Arc::new(VoiceExchange::new(
        recorder, backend, player, cue, notifier, config,
    ));

    let mut presenter = Presenter::new();
    presenter.info(&format!(
        "Session {} @ {}",
        options.session_id, options.server_url
    ));
    presenter.info("Enter toggles recording; 'q' quits.");
    presenter.status(STATUS_FIRST_PROMPT);

    let mut log = ChatLog::new();
    chat_loop(&use_case, &mut log, &mut presenter).await;

    // Drop a capture left open on exit
    if use_case.is_capturing() {
        let _ = use_case.cancel().await;
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// The UI loop: stdin toggles, exchange outcomes, and the max-duration
/// watchdog all land here, one at a time.
async fn chat_loop<R, B, P, A, N>(
    use_case: &Arc<VoiceExchange<R, B, P, A, N>>,
    log: &mut ChatLog,
    presenter: &mut Presenter,
) where
    R: CaptureStream + 'static,
    B: ChatBackend + 'static,
    P: ReplyPlayer + 'static,
    A: AudioCue + 'static,
    N: Notifier + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<ExchangeOutcome>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut watchdog = tokio::time::interval(StdDuration::from_millis(250));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(input)) => {
                        let input = input.trim();
                        if matches!(input, "q" | "quit" | "exit") {
                            break;
                        } else if input.is_empty() {
                            handle_toggle(use_case, presenter, &tx).await;
                        } else {
                            presenter.info("Enter toggles recording; 'q' quits.");
                        }
                    }
                    // stdin closed or unreadable
                    Ok(None) => break,
                    Err(e) => {
                        presenter.error(&format!("Failed to read input: {}", e));
                        break;
                    }
                }
            }

            Some(outcome) = rx.recv() => {
                handle_outcome(use_case, outcome, log, presenter);
            }

            _ = watchdog.tick() => {
                if use_case.is_capturing() && use_case.check_max_duration() {
                    presenter.warn("Max capture duration reached, auto-stopping");
                    finish_capture(use_case, presenter, &tx).await;
                }
            }

            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }
}

/// Toggle the capture: begin when idle, end when capturing
async fn handle_toggle<R, B, P, A, N>(
    use_case: &Arc<VoiceExchange<R, B, P, A, N>>,
    presenter: &mut Presenter,
    tx: &mpsc::UnboundedSender<ExchangeOutcome>,
) where
    R: CaptureStream + 'static,
    B: ChatBackend + 'static,
    P: ReplyPlayer + 'static,
    A: AudioCue + 'static,
    N: Notifier + 'static,
{
    match use_case.state().await {
        CaptureState::Idle => match use_case.begin_capture().await {
            Ok(()) => {
                presenter.status_recording(STATUS_RECORDING);
            }
            Err(VoiceExchangeError::Recording(e)) if e.is_capability() => {
                presenter.warn(&e.to_string());
                presenter.status(STATUS_MIC_ERROR);
            }
            Err(e) => {
                presenter.error(&e.to_string());
            }
        },
        CaptureState::Capturing => {
            finish_capture(use_case, presenter, tx).await;
        }
    }
}

/// End the capture and hand the payload to a background exchange task
async fn finish_capture<R, B, P, A, N>(
    use_case: &Arc<VoiceExchange<R, B, P, A, N>>,
    presenter: &mut Presenter,
    tx: &mpsc::UnboundedSender<ExchangeOutcome>,
) where
    R: CaptureStream + 'static,
    B: ChatBackend + 'static,
    P: ReplyPlayer + 'static,
    A: AudioCue + 'static,
    N: Notifier + 'static,
{
    match use_case.end_capture().await {
        Ok(audio) => {
            presenter.start_spinner(STATUS_PROCESSING);

            let use_case = Arc::clone(use_case);
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = use_case.exchange(audio).await;
                let _ = tx.send(outcome);
            });
        }
        Err(VoiceExchangeError::Recording(RecordingError::EmptyCapture)) => {
            presenter.warn("No audio captured");
            presenter.status(STATUS_IDLE_PROMPT);
        }
        Err(e) => {
            presenter.error(&e.to_string());
            presenter.status(STATUS_IDLE_PROMPT);
        }
    }
}

/// Apply one exchange outcome to the log and status surface
fn handle_outcome<R, B, P, A, N>(
    use_case: &Arc<VoiceExchange<R, B, P, A, N>>,
    outcome: ExchangeOutcome,
    log: &mut ChatLog,
    presenter: &mut Presenter,
) where
    R: CaptureStream + 'static,
    B: ChatBackend + 'static,
    P: ReplyPlayer + 'static,
    A: AudioCue + 'static,
    N: Notifier + 'static,
{
    presenter.stop_spinner();

    match outcome {
        Ok(reply) => {
            if let Some(message) = reply.error {
                presenter.status(&format!("Error: {}", sanitize(&message)));
                return;
            }

            if let Some(transcription) = reply.transcription {
                log.push(Sender::You, transcription.clone());
                presenter.chat_entry(Sender::You, &transcription);
            }
            if let Some(response) = reply.llm_response {
                log.push(Sender::Ai, response.clone());
                presenter.chat_entry(Sender::Ai, &response);
            }

            if let Some(url) = reply.audio_url.as_deref() {
                use_case.play_reply(url);
            }

            presenter.status(STATUS_IDLE_PROMPT);
        }
        Err(e) => {
            presenter.warn(&e.to_string());
            presenter.status(STATUS_CONNECTION_ERROR);
        }
    }
}

/// Load and merge configuration from file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Merge: defaults < file < cli (env vars arrive through clap)
    AppConfig::defaults().merge(file_config).merge(cli_config)
}
