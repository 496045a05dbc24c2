//! voxchat - single-session voice assistant
//!
//! Records a user's speech, transcribes it, sends the transcript (with the
//! full conversation history) to a chat-completion model, synthesizes the
//! reply as speech, and renders a running chat transcript.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                Interactive loop                   │
//! │        record │ reset │ model select              │
//! └───────────────────────┬──────────────────────────┘
//!                         │ one clip per trigger
//! ┌───────────────────────▼──────────────────────────┐
//! │               TurnController                      │
//! │  capture → STT → session → chat → TTS → render   │
//! └───────────────────────┬──────────────────────────┘
//!                         │
//! ┌───────────────────────▼──────────────────────────┐
//! │        OpenAI APIs (Whisper / chat / speech)      │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod providers;
pub mod render;
pub mod session;
pub mod turn;
pub mod voice;

pub use config::{Config, VoiceConfig};
pub use error::{Error, Result};
pub use providers::{ChatClient, ChatModel, Respond, SpeechToText, Synthesize, TextToSpeech, Transcribe};
pub use session::{ChatMessage, Session, Speaker, Turn};
pub use turn::{RenderedTurn, SkipReason, TurnController, TurnOutcome, TurnState};
pub use voice::{AudioCapture, AudioClip, SAMPLE_RATE};
