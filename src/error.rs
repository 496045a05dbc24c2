//! Error types for voxchat

use thiserror::Error;

/// Result type alias for voxchat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in voxchat
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (fatal at startup)
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device or encoding error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error (aborts the current turn)
    #[error("STT error: {0}")]
    Stt(String),

    /// Chat completion error (aborts the current turn)
    #[error("chat error: {0}")]
    Chat(String),

    /// Text-to-speech error (turn completes text-only)
    #[error("TTS error: {0}")]
    Tts(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
