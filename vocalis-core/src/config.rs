//! Configuration for the pronunciation service

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Path or name of the eSpeak NG executable
    pub espeak_path: PathBuf,

    /// HTTP listen port
    pub http_port: u16,

    /// Directory searched for index.html
    pub static_dir: PathBuf,

    /// Timeout for phoneme extraction (seconds)
    pub extract_timeout_secs: u64,

    /// Timeout for audio rendering (seconds)
    pub render_timeout_secs: u64,

    /// Default voice identifier
    pub default_voice: String,

    /// Default speech rate (words per minute, 1-500)
    pub default_speed: u32,

    /// Default pitch (0-99, 50 is normal)
    pub default_pitch: u32,

    /// Maximum accepted word length in bytes
    pub max_word_len: usize,

    /// Maximum audio size returned to a client
    pub max_audio_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            espeak_path: PathBuf::from("espeak-ng"),
            http_port: 8001,
            static_dir: PathBuf::from("./static"),
            extract_timeout_secs: 5,
            render_timeout_secs: 10,
            default_voice: "en".to_string(),
            default_speed: 175,
            default_pitch: 50,
            max_word_len: 256,
            max_audio_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    /// Build a configuration from defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("VOCALIS_ESPEAK_PATH") {
            if !path.is_empty() {
                config.espeak_path = PathBuf::from(path);
            }
        }

        if let Ok(port) = std::env::var("VOCALIS_PORT") {
            config.http_port = port
                .parse()
                .map_err(|_| Error::Configuration(format!("Invalid VOCALIS_PORT: {}", port)))?;
        }

        if let Ok(dir) = std::env::var("VOCALIS_STATIC_DIR") {
            if !dir.is_empty() {
                config.static_dir = PathBuf::from(dir);
            }
        }

        if let Ok(voice) = std::env::var("VOCALIS_VOICE") {
            if !voice.is_empty() {
                config.default_voice = voice;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.extract_timeout_secs == 0 || self.render_timeout_secs == 0 {
            return Err(Error::Configuration(
                "Timeouts must be greater than 0".to_string(),
            ));
        }

        if self.extract_timeout_secs > 300 || self.render_timeout_secs > 300 {
            return Err(Error::Configuration(
                "Timeouts too large (max 300 seconds)".to_string(),
            ));
        }

        if self.default_speed == 0 || self.default_speed > 500 {
            return Err(Error::Configuration(
                "Speech rate must be between 1 and 500 WPM".to_string(),
            ));
        }

        if self.default_pitch > 99 {
            return Err(Error::Configuration(
                "Pitch must be between 0 and 99".to_string(),
            ));
        }

        if !self.default_voice.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::Configuration(
                "Voice contains invalid characters (only alphanumeric and '-' allowed)".to_string(),
            ));
        }

        if self.max_word_len == 0 || self.max_word_len > 4096 {
            return Err(Error::Configuration(
                "Max word length must be between 1 and 4096".to_string(),
            ));
        }

        if self.max_audio_bytes == 0 {
            return Err(Error::Configuration(
                "Max audio size must be greater than 0".to_string(),
            ));
        }

        // Prevent path traversal in the static dir
        if self.static_dir.to_string_lossy().contains("..") {
            return Err(Error::Configuration(
                "Static directory path cannot contain '..'".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_voice, "en");
        assert_eq!(config.default_speed, 175);
        assert_eq!(config.default_pitch, 50);
        assert_eq!(config.extract_timeout_secs, 5);
        assert_eq!(config.render_timeout_secs, 10);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = ServiceConfig::default();
        config.extract_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_speed_out_of_range_rejected() {
        let mut config = ServiceConfig::default();
        config.default_speed = 600;
        assert!(config.validate().is_err());

        config.default_speed = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pitch_out_of_range_rejected() {
        let mut config = ServiceConfig::default();
        config.default_pitch = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_voice_with_shell_metacharacters_rejected() {
        let mut config = ServiceConfig::default();
        config.default_voice = "en; rm -rf /".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_static_dir_traversal_rejected() {
        let mut config = ServiceConfig::default();
        config.static_dir = PathBuf::from("../secrets");
        assert!(config.validate().is_err());
    }
}
