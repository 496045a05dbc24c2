//! Configuration management for voxchat

pub mod file;

use crate::providers::ChatModel;
use crate::{Error, Result};

/// voxchat configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key (the single external-service credential)
    pub api_key: String,

    /// Chat-completion model selection
    pub chat_model: ChatModel,

    /// Voice configuration
    pub voice: VoiceConfig,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
        }
    }
}

impl Config {
    /// Load configuration with env > TOML file > default layering
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no API key is present in the environment
    /// or the config file, or if a model/speed override is invalid.
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .or(fc.api_key)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config("OPENAI_API_KEY not set (env or config file)".to_string())
            })?;

        let chat_model = std::env::var("VOXCHAT_CHAT_MODEL")
            .ok()
            .or(fc.chat.model)
            .map_or(Ok(ChatModel::default()), |s| s.parse())?;

        let default_voice = VoiceConfig::default();
        let voice = VoiceConfig {
            stt_model: std::env::var("VOXCHAT_STT_MODEL")
                .ok()
                .or(fc.voice.stt_model)
                .unwrap_or(default_voice.stt_model),
            tts_model: std::env::var("VOXCHAT_TTS_MODEL")
                .ok()
                .or(fc.voice.tts_model)
                .unwrap_or(default_voice.tts_model),
            tts_voice: std::env::var("VOXCHAT_TTS_VOICE")
                .ok()
                .or(fc.voice.tts_voice)
                .unwrap_or(default_voice.tts_voice),
            tts_speed: std::env::var("VOXCHAT_TTS_SPEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.voice.tts_speed)
                .unwrap_or(default_voice.tts_speed),
        };

        if !(0.25..=4.0).contains(&voice.tts_speed) {
            return Err(Error::Config(format!(
                "tts_speed {} out of range (0.25..=4.0)",
                voice.tts_speed
            )));
        }

        Ok(Self {
            api_key,
            chat_model,
            voice,
        })
    }
}
