//! Cross-platform capture adapter using cpal
//!
//! Accumulates microphone fragments into a buffer while the capture flag
//! is set, then normalizes (downmix, resample to 16kHz) and wraps the
//! result in a WAV container at stop time.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::time::Duration as TokioDuration;

use super::wav_encoder::{encode_to_wav, TARGET_SAMPLE_RATE};
use crate::application::ports::{CaptureStream, RecordingError};
use crate::domain::capture::{AudioData, AudioMimeType};

/// Microphone capture adapter.
///
/// The cpal stream is not `Send`, so it lives on a dedicated thread for
/// the whole capture span; this struct only shares the fragment buffer
/// and a handful of atomics with it.
pub struct CpalCapture {
    /// Captured fragments (mono, i16, at device sample rate)
    fragments: Arc<StdMutex<Vec<i16>>>,
    /// Device sample rate (may differ from the 16kHz target)
    device_sample_rate: Arc<AtomicU32>,
    /// Capture flag; fragments are only appended while set
    is_capturing: Arc<AtomicBool>,
    /// Start time as millis since epoch, for elapsed tracking
    start_time_ms: Arc<AtomicU64>,
    /// Elapsed capture time in milliseconds
    elapsed_ms: Arc<AtomicU64>,
    /// Startup failure reported by the capture thread
    start_error: Arc<StdMutex<Option<RecordingError>>>,
}

impl CpalCapture {
    /// Create a new cpal-based capture stream
    pub fn new() -> Self {
        Self {
            fragments: Arc::new(StdMutex::new(Vec::new())),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            is_capturing: Arc::new(AtomicBool::new(false)),
            start_time_ms: Arc::new(AtomicU64::new(0)),
            elapsed_ms: Arc::new(AtomicU64::new(0)),
            start_error: Arc::new(StdMutex::new(None)),
        }
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, RecordingError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(RecordingError::NoAudioDevice)
    }

    /// Get a suitable input configuration
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), RecordingError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| RecordingError::StartFailed(format!("Failed to get configs: {}", e)))?;

        // Prefer mono and configs that include the 16kHz target;
        // only i16 and f32 formats are considered.
        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && config.max_sample_rate().0 >= TARGET_SAMPLE_RATE;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > TARGET_SAMPLE_RATE;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(RecordingError::StartFailed(
            "No suitable input config found".into(),
        ))?;

        let sample_rate = if config_range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
            && config_range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
        {
            SampleRate(TARGET_SAMPLE_RATE)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Append one fragment to the buffer, in arrival order.
    /// Empty fragments are skipped; nothing is appended once the capture
    /// flag clears.
    fn push_fragment(
        fragments: &Arc<StdMutex<Vec<i16>>>,
        is_capturing: &Arc<AtomicBool>,
        fragment: &[i16],
    ) {
        if fragment.is_empty() || !is_capturing.load(Ordering::SeqCst) {
            return;
        }
        if let Ok(mut buffer) = fragments.lock() {
            buffer.extend_from_slice(fragment);
        }
    }

    /// Mix interleaved multi-channel samples down to mono
    fn downmix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// Resample audio from the device rate to 16kHz if needed
    fn resample_to_16k(samples: &[i16], source_rate: u32) -> Result<Vec<i16>, RecordingError> {
        if source_rate == TARGET_SAMPLE_RATE {
            return Ok(samples.to_vec());
        }

        let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

        let ratio = TARGET_SAMPLE_RATE as f64 / source_rate as f64;
        let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            source_rate as usize,
            TARGET_SAMPLE_RATE as usize,
            1024, // Chunk size
            2,    // Sub-chunks
            1,    // Mono
        )
        .map_err(|e| RecordingError::CaptureFailed(format!("Resampler init failed: {}", e)))?;

        let mut output = Vec::with_capacity(output_len);
        let mut input_pos = 0;

        while input_pos < samples_f32.len() {
            let frames_needed = resampler.input_frames_next();
            let end_pos = (input_pos + frames_needed).min(samples_f32.len());

            // Pad the tail chunk so the resampler always gets a full frame
            let mut chunk = samples_f32[input_pos..end_pos].to_vec();
            if chunk.len() < frames_needed {
                chunk.resize(frames_needed, 0.0);
            }

            let resampled = resampler
                .process(&[chunk], None)
                .map_err(|e| RecordingError::CaptureFailed(format!("Resampling failed: {}", e)))?;

            output.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
            input_pos = end_pos;
        }

        output.truncate(output_len);

        Ok(output)
    }

    /// Normalize the fragment buffer and wrap it in a WAV container
    fn assemble_payload(samples: &[i16], sample_rate: u32) -> Result<AudioData, RecordingError> {
        let resampled = Self::resample_to_16k(samples, sample_rate)?;

        let wav_data = encode_to_wav(&resampled)
            .map_err(|e| RecordingError::CaptureFailed(format!("Encoding failed: {}", e)))?;

        Ok(AudioData::new(wav_data, AudioMimeType::Wav))
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureStream for CpalCapture {
    async fn start(&self) -> Result<(), RecordingError> {
        if self.is_capturing.load(Ordering::SeqCst) {
            return Err(RecordingError::StartFailed(
                "Capture already in progress".to_string(),
            ));
        }

        // Reset the fragment buffer and any stale startup error
        {
            let mut buffer = self
                .fragments
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            buffer.clear();
        }
        {
            let mut slot = self
                .start_error
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            *slot = None;
        }

        self.is_capturing.store(true, Ordering::SeqCst);

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.start_time_ms.store(now, Ordering::SeqCst);
        self.elapsed_ms.store(0, Ordering::SeqCst);

        let fragments = Arc::clone(&self.fragments);
        let device_sample_rate = Arc::clone(&self.device_sample_rate);
        let is_capturing = Arc::clone(&self.is_capturing);
        let elapsed_ms = Arc::clone(&self.elapsed_ms);
        let start_time_ms = Arc::clone(&self.start_time_ms);
        let start_error = Arc::clone(&self.start_error);

        // The stream lives on this thread until the capture flag clears
        std::thread::spawn(move || {
            let fail = |err: RecordingError| {
                if let Ok(mut slot) = start_error.lock() {
                    *slot = Some(err);
                }
                is_capturing.store(false, Ordering::SeqCst);
            };

            let device = match CpalCapture::get_input_device() {
                Ok(d) => d,
                Err(e) => return fail(e),
            };

            let (config, sample_format) = match CpalCapture::get_input_config(&device) {
                Ok(c) => c,
                Err(e) => return fail(e),
            };

            let sample_rate = config.sample_rate.0;
            let channels = config.channels;
            device_sample_rate.store(sample_rate, Ordering::SeqCst);

            let stream_result = match sample_format {
                SampleFormat::I16 => {
                    let fragments = Arc::clone(&fragments);
                    let is_capturing = Arc::clone(&is_capturing);

                    device.build_input_stream(
                        &config,
                        move |data: &[i16], _: &cpal::InputCallbackInfo| {
                            let mono = CpalCapture::downmix_to_mono(data, channels);
                            CpalCapture::push_fragment(&fragments, &is_capturing, &mono);
                        },
                        |err| eprintln!("Audio stream error: {}", err),
                        None,
                    )
                }

                SampleFormat::F32 => {
                    let fragments = Arc::clone(&fragments);
                    let is_capturing = Arc::clone(&is_capturing);

                    device.build_input_stream(
                        &config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            let i16_data: Vec<i16> =
                                data.iter().map(|&s| (s * 32767.0) as i16).collect();
                            let mono = CpalCapture::downmix_to_mono(&i16_data, channels);
                            CpalCapture::push_fragment(&fragments, &is_capturing, &mono);
                        },
                        |err| eprintln!("Audio stream error: {}", err),
                        None,
                    )
                }

                _ => {
                    return fail(RecordingError::StartFailed(
                        "Unsupported sample format".into(),
                    ))
                }
            };

            let stream = match stream_result {
                Ok(s) => s,
                Err(e) => return fail(RecordingError::StartFailed(e.to_string())),
            };

            if let Err(e) = stream.play() {
                return fail(RecordingError::StartFailed(e.to_string()));
            }

            // Keep the stream alive until stop/cancel clears the flag
            while is_capturing.load(Ordering::SeqCst) {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or(0);
                let start = start_time_ms.load(Ordering::SeqCst);
                elapsed_ms.store(now.saturating_sub(start), Ordering::SeqCst);

                std::thread::sleep(std::time::Duration::from_millis(100));
            }

            drop(stream);
        });

        // Give the thread a moment to open the device
        tokio::time::sleep(TokioDuration::from_millis(50)).await;

        if !self.is_capturing.load(Ordering::SeqCst) {
            let err = {
                let mut slot = self
                    .start_error
                    .lock()
                    .unwrap_or_else(|e| e.into_inner());
                slot.take()
            };
            return Err(err.unwrap_or_else(|| {
                RecordingError::StartFailed("Failed to start capture".into())
            }));
        }

        Ok(())
    }

    async fn stop(&self) -> Result<AudioData, RecordingError> {
        if !self.is_capturing.load(Ordering::SeqCst) {
            return Err(RecordingError::CaptureFailed(
                "No capture in progress".to_string(),
            ));
        }

        self.is_capturing.store(false, Ordering::SeqCst);

        // Give the thread a moment to drop the stream
        tokio::time::sleep(TokioDuration::from_millis(100)).await;

        let sample_rate = self.device_sample_rate.load(Ordering::SeqCst);
        if sample_rate == 0 {
            return Err(RecordingError::CaptureFailed("Sample rate not set".into()));
        }

        let samples = {
            let mut buffer = self
                .fragments
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *buffer)
        };

        if samples.is_empty() {
            return Err(RecordingError::EmptyCapture);
        }

        // Normalize and encode off the async runtime
        let payload =
            tokio::task::spawn_blocking(move || Self::assemble_payload(&samples, sample_rate))
                .await
                .map_err(|e| {
                    RecordingError::CaptureFailed(format!("Encode task error: {}", e))
                })??;

        Ok(payload)
    }

    async fn cancel(&self) -> Result<(), RecordingError> {
        self.is_capturing.store(false, Ordering::SeqCst);

        tokio::time::sleep(TokioDuration::from_millis(100)).await;

        {
            let mut buffer = self
                .fragments
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            buffer.clear();
        }

        self.elapsed_ms.store(0, Ordering::SeqCst);

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.is_capturing.load(Ordering::SeqCst)
    }

    fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_single_channel_is_identity() {
        let mono = vec![100i16, 200, 300];
        let result = CpalCapture::downmix_to_mono(&mono, 1);
        assert_eq!(result, mono);
    }

    #[test]
    fn downmix_two_channels_averages_pairs() {
        let stereo = vec![100i16, 200, 300, 400];
        let result = CpalCapture::downmix_to_mono(&stereo, 2);
        assert_eq!(result, vec![150, 350]);
    }

    #[test]
    fn push_fragment_skips_empty() {
        let fragments = Arc::new(StdMutex::new(Vec::new()));
        let is_capturing = Arc::new(AtomicBool::new(true));

        CpalCapture::push_fragment(&fragments, &is_capturing, &[]);
        assert!(fragments.lock().unwrap().is_empty());
    }

    #[test]
    fn push_fragment_preserves_arrival_order() {
        let fragments = Arc::new(StdMutex::new(Vec::new()));
        let is_capturing = Arc::new(AtomicBool::new(true));

        CpalCapture::push_fragment(&fragments, &is_capturing, &[1, 2]);
        CpalCapture::push_fragment(&fragments, &is_capturing, &[]);
        CpalCapture::push_fragment(&fragments, &is_capturing, &[3]);

        assert_eq!(*fragments.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn push_fragment_ignored_after_flag_clears() {
        let fragments = Arc::new(StdMutex::new(Vec::new()));
        let is_capturing = Arc::new(AtomicBool::new(false));

        CpalCapture::push_fragment(&fragments, &is_capturing, &[1, 2, 3]);
        assert!(fragments.lock().unwrap().is_empty());
    }

    #[test]
    fn resample_same_rate_is_identity() {
        let samples = vec![1i16, 2, 3, 4];
        let result = CpalCapture::resample_to_16k(&samples, TARGET_SAMPLE_RATE).unwrap();
        assert_eq!(result, samples);
    }

    #[test]
    fn resample_halves_sample_count_from_32k() {
        let samples = vec![0i16; 3200];
        let result = CpalCapture::resample_to_16k(&samples, 32000).unwrap();
        assert_eq!(result.len(), 1600);
    }

    #[test]
    fn assemble_payload_is_wav() {
        let samples = vec![0i16; 1600];
        let payload = CpalCapture::assemble_payload(&samples, TARGET_SAMPLE_RATE).unwrap();
        assert_eq!(payload.mime_type(), AudioMimeType::Wav);
        assert_eq!(&payload.data()[0..4], b"RIFF");
    }

    #[test]
    fn capture_default_state() {
        let capture = CpalCapture::new();
        assert!(!capture.is_capturing());
        assert_eq!(capture.elapsed_ms(), 0);
    }

    #[tokio::test]
    async fn stop_without_start_fails() {
        let capture = CpalCapture::new();
        let result = capture.stop().await;
        assert!(matches!(result, Err(RecordingError::CaptureFailed(_))));
    }
}
