//! WAV encoder for the upload payload
//!
//! The backend accepts a plain WAV container, so the capture pipeline
//! normalizes everything to speech-friendly settings:
//! - 16kHz sample rate (resampled from the device rate)
//! - Mono channel
//! - 16-bit samples

use std::io::Cursor;

/// Target sample rate for speech-optimized encoding
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// WAV encoding errors
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("WAV write failed: {0}")]
    Write(String),

    #[error("WAV finalize failed: {0}")]
    Finalize(String),
}

/// Encode PCM samples to a WAV container
///
/// Input: mono i16 samples at 16kHz
/// Output: WAV bytes
pub fn encode_to_wav(pcm_samples: &[i16]) -> Result<Vec<u8>, EncodingError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: TARGET_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| EncodingError::Write(e.to_string()))?;

        for &sample in pcm_samples {
            writer
                .write_sample(sample)
                .map_err(|e| EncodingError::Write(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| EncodingError::Finalize(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
