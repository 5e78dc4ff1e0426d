//! Session configuration
//!
//! Aggregates the vision and speech sections with the session's own
//! settings. Loadable from JSON, TOML or YAML and overridable from
//! `PATHSENSE_*` environment variables.

use pathsense_core::{parse_config, read_config_file, ConfigError};
use pathsense_eye::VisionConfig;
use pathsense_spk::SpeechConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

pub const ENV_RESULT_WINDOW_MS: &str = "PATHSENSE_RESULT_WINDOW_MS";
pub const ENV_ANNOUNCE: &str = "PATHSENSE_ANNOUNCE";
pub const ENV_LANGUAGE: &str = "PATHSENSE_LANGUAGE";
pub const ENV_MIN_SCORE: &str = "PATHSENSE_MIN_SCORE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long a cue and its detections stay visible
    pub result_window_ms: u64,
    /// Speak the cue after a successful cycle
    pub announce_results: bool,
    /// Capacity of the session event channel
    pub event_buffer: usize,
    pub vision: VisionConfig,
    pub speech: SpeechConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            result_window_ms: 5000,
            announce_results: true,
            event_buffer: 64,
            vision: VisionConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON, TOML or YAML document.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = parse_config(content)?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = read_config_file(path)?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_from(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from a key lookup. Unparseable values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_RESULT_WINDOW_MS) {
            match value.trim().parse::<u64>() {
                Ok(ms) => self.result_window_ms = ms,
                Err(_) => warn!("Ignoring {}={:?}: not an integer", ENV_RESULT_WINDOW_MS, value),
            }
        }

        if let Some(value) = lookup(ENV_ANNOUNCE) {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.announce_results = true,
                "0" | "false" | "no" | "off" => self.announce_results = false,
                _ => warn!("Ignoring {}={:?}: not a boolean", ENV_ANNOUNCE, value),
            }
        }

        if let Some(value) = lookup(ENV_LANGUAGE) {
            let value = value.trim();
            if !value.is_empty() {
                self.speech.voice.language = value.to_string();
            }
        }

        if let Some(value) = lookup(ENV_MIN_SCORE) {
            match value.trim().parse::<f32>() {
                Ok(score) => self.vision.min_score = score,
                Err(_) => warn!("Ignoring {}={:?}: not a number", ENV_MIN_SCORE, value),
            }
        }
    }

    pub fn result_window(&self) -> Duration {
        Duration::from_millis(self.result_window_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.result_window_ms == 0 {
            return Err("result_window_ms must be greater than 0".to_string());
        }

        if self.result_window_ms > 600_000 {
            return Err("result_window_ms too large (max 600000)".to_string());
        }

        if self.event_buffer == 0 || self.event_buffer > 10_000 {
            return Err("event_buffer must be between 1 and 10000".to_string());
        }

        self.vision.validate().map_err(|e| format!("vision: {}", e))?;
        self.speech.validate().map_err(|e| format!("speech: {}", e))?;
        Ok(())
    }
}
