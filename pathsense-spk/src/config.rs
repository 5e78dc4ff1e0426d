//! Configuration for speech output

use serde::{Deserialize, Serialize};

/// Speech output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Announce cues at all
    pub enabled: bool,

    /// Voice settings
    pub voice: VoiceConfig,

    /// Rate multiplier (1.0 = platform default, 0.1-4.0)
    pub rate: f32,

    /// Pitch multiplier (1.0 = platform default, 0.5-2.0)
    pub pitch: f32,

    /// Volume (0.0-1.0)
    pub volume: f32,

    /// Longest utterance accepted, in characters
    pub max_utterance_chars: usize,
}

/// Voice configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Voice name/identifier
    pub name: Option<String>,

    /// Language code (e.g., "en", "en-US")
    pub language: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            voice: VoiceConfig::default(),
            rate: 0.8,
            pitch: 1.0,
            volume: 1.0,
            max_utterance_chars: 1000,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            name: None,
            language: "en".to_string(),
        }
    }
}

impl VoiceConfig {
    /// Validate voice configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.language.is_empty() {
            return Err("Language code cannot be empty".to_string());
        }

        if self.language.len() > 32 {
            return Err("Language code too long (max 32 chars)".to_string());
        }

        if !self.language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err("Language code contains invalid characters (only alphanumeric and '-' allowed)".to_string());
        }

        if let Some(ref name) = self.name {
            if name.is_empty() {
                return Err("Voice name cannot be empty if provided".to_string());
            }

            if name.len() > 256 {
                return Err("Voice name too long (max 256 chars)".to_string());
            }

            // Passed to command-line engines as an argument
            if name.chars().any(|c| c == '\0' || c.is_control()) {
                return Err("Voice name contains invalid characters".to_string());
            }
        }

        Ok(())
    }
}

impl SpeechConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.rate.is_finite() || !(0.1..=4.0).contains(&self.rate) {
            return Err("Speech rate must be between 0.1 and 4.0".to_string());
        }

        if !self.pitch.is_finite() || !(0.5..=2.0).contains(&self.pitch) {
            return Err("Pitch must be between 0.5 and 2.0".to_string());
        }

        if !self.volume.is_finite() || !(0.0..=1.0).contains(&self.volume) {
            return Err("Volume must be between 0.0 and 1.0".to_string());
        }

        if self.max_utterance_chars == 0 || self.max_utterance_chars > 100_000 {
            return Err("max_utterance_chars must be between 1 and 100000".to_string());
        }

        self.voice.validate()
    }
}
