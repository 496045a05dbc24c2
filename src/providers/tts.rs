//! Text-to-speech (TTS) processing

use std::io::Write;

use async_trait::async_trait;

use super::Synthesize;
use crate::{Error, Result};

/// Synthesizes speech from text via the OpenAI speech API
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    speed: f64,
    model: String,
}

impl TextToSpeech {
    /// Create a new TTS instance
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: String, model: String, voice: String, speed: f64) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("OpenAI API key required for TTS".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            speed,
            model,
        })
    }
}

#[async_trait]
impl Synthesize for TextToSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f64,
        }

        tracing::debug!(text_len = text.len(), voice = %self.voice, "synthesizing speech");

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("TTS API error {status}: {body}")));
        }

        let audio = response.bytes().await?;

        // Spool through a uniquely named temp file before inline delivery;
        // removed on drop on success and failure paths alike
        let mut spool = tempfile::Builder::new()
            .prefix("voxchat-reply-")
            .suffix(".mp3")
            .tempfile()?;
        spool.write_all(&audio)?;
        spool.flush()?;
        let audio = std::fs::read(spool.path())?;

        tracing::info!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio)
    }
}
