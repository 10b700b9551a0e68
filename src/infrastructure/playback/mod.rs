//! Reply audio playback adapters

pub mod rodio;

pub use self::rodio::RodioReplyPlayer;
