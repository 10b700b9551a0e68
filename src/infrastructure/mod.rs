//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like cpal, the agent API, rodio, etc.

pub mod audio_cue;
pub mod backend;
pub mod config;
pub mod notification;
pub mod playback;
pub mod recording;

// Re-export adapters
pub use audio_cue::RodioAudioCue;
pub use backend::AgentApiBackend;
pub use config::XdgConfigStore;
pub use notification::DesktopNotifier;
pub use playback::RodioReplyPlayer;
pub use recording::CpalCapture;
