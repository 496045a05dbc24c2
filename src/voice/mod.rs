//! Voice capture module
//!
//! Microphone capture and WAV encoding. Transcription and synthesis live
//! in `providers`.

mod capture;

pub use capture::{AudioCapture, AudioClip, SAMPLE_RATE, samples_to_wav};
