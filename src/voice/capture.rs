//! Audio capture from microphone

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// A finite audio recording, ready for transcription
///
/// The id is a per-session monotonic counter; the turn controller uses it
/// to guarantee a clip produces at most one turn.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Monotonic clip identifier within this session
    pub id: u64,

    /// WAV-encoded audio (16kHz mono s16)
    pub wav: Vec<u8>,

    /// Length of the recording
    pub duration: Duration,
}

impl AudioClip {
    /// Check whether the clip contains any audio at all
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.duration.is_zero()
    }
}

/// Captures audio from the default input device
pub struct AudioCapture {
    #[allow(dead_code)]
    device: Device,
    config: StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
    next_clip_id: u64,
}

impl AudioCapture {
    /// Create a new audio capture instance
    ///
    /// # Errors
    ///
    /// Returns error if audio device cannot be opened
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable audio config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            channels = config.channels,
            "audio capture initialized"
        );

        Ok(Self {
            device,
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            next_clip_id: 0,
        })
    }

    /// Start recording
    ///
    /// # Errors
    ///
    /// Returns error if the input stream cannot be built
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let buffer = Arc::clone(&self.buffer);
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device".to_string()))?;

        let config = self.config.clone();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);

        tracing::debug!("recording started");
        Ok(())
    }

    /// Stop recording and take the finished clip
    ///
    /// Returns `None` if nothing was captured since the last start.
    ///
    /// # Errors
    ///
    /// Returns error if WAV encoding fails
    pub fn stop(&mut self) -> Result<Option<AudioClip>> {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            tracing::debug!("recording stopped");
        }

        let samples = self
            .buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default();

        if samples.is_empty() {
            return Ok(None);
        }

        #[allow(clippy::cast_precision_loss)]
        let duration = Duration::from_secs_f64(samples.len() as f64 / f64::from(SAMPLE_RATE));
        let wav = samples_to_wav(&samples, SAMPLE_RATE)?;

        let id = self.next_clip_id;
        self.next_clip_id += 1;

        tracing::debug!(clip = id, secs = duration.as_secs_f64(), "clip captured");
        Ok(Some(AudioClip { id, wav, duration }))
    }

    /// Check if currently recording
    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.stream.is_some()
    }

    /// Get the sample rate
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Instantaneous RMS of the capture buffer, for level metering
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn level(&self) -> f32 {
        let Ok(buf) = self.buffer.lock() else {
            return 0.0;
        };
        if buf.is_empty() {
            return 0.0;
        }
        let sum_squares: f32 = buf.iter().map(|s| s * s).sum();
        (sum_squares / buf.len() as f32).sqrt()
    }

    /// Clear the capture buffer without producing a clip
    pub fn clear_buffer(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }
}

/// Convert f32 samples to WAV bytes for the transcription API
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            // Convert f32 [-1.0, 1.0] to i16
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
