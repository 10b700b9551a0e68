//! Audio cue adapters

pub mod rodio;

pub use self::rodio::RodioAudioCue;
