//! Audio capture adapters

pub mod cpal_capture;
pub mod wav_encoder;

pub use cpal_capture::CpalCapture;
pub use wav_encoder::TARGET_SAMPLE_RATE;
