//! External service providers
//!
//! Each collaborator in the turn pipeline is reached through a narrow async
//! trait so the turn controller can be exercised without network access.

mod chat;
mod stt;
mod tts;

use async_trait::async_trait;

pub use chat::{ChatClient, ChatModel};
pub use stt::SpeechToText;
pub use tts::TextToSpeech;

use crate::Result;
use crate::session::ChatMessage;

/// Converts an audio clip to text
#[async_trait]
pub trait Transcribe: Send + Sync {
    /// Transcribe WAV audio to text
    async fn transcribe(&self, wav: &[u8]) -> Result<String>;
}

/// Converts a conversation history to a reply
#[async_trait]
pub trait Respond: Send + Sync {
    /// Produce a reply for the full ordered prompt history
    async fn respond(&self, history: &[ChatMessage], model: ChatModel) -> Result<String>;
}

/// Converts a reply string to playable audio
#[async_trait]
pub trait Synthesize: Send + Sync {
    /// Synthesize text to audio bytes (MP3)
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}
