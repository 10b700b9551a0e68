//! Capture domain types
//!
//! The capture session state machine, the audio payload value object,
//! and the duration value object used for the max-capture safety limit.

pub mod audio_data;
pub mod duration;
pub mod session;

pub use audio_data::{AudioData, AudioMimeType};
pub use duration::Duration;
pub use session::{CaptureSession, CaptureState, InvalidStateTransition};
