//! TOML configuration file loading
//!
//! Supports `~/.config/voxchat/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct VoxchatConfigFile {
    /// OpenAI API key (env `OPENAI_API_KEY` takes precedence)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat model configuration
    #[serde(default)]
    pub chat: ChatFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,
}

/// Chat-completion configuration
#[derive(Debug, Default, Deserialize)]
pub struct ChatFileConfig {
    /// Model identifier (e.g. "gpt-4" or "gpt-3.5-turbo")
    pub model: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f64>,
}

/// Load the TOML config file from the standard path
///
/// Returns `VoxchatConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> VoxchatConfigFile {
    let Some(path) = config_file_path() else {
        return VoxchatConfigFile::default();
    };

    if !path.exists() {
        return VoxchatConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                VoxchatConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            VoxchatConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/voxchat/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("voxchat").join("config.toml"))
}
