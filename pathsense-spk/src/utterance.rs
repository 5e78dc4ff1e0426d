//! Validated text handed to a speech engine

use crate::error::SpeechError;
use pathsense_core::SpatialCue;
use std::fmt;

pub const DEFAULT_MAX_CHARS: usize = 1000;

/// Text ready to be spoken: control characters stripped, trimmed, non-empty
/// and no longer than the configured limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance(String);

impl Utterance {
    pub fn new(text: &str, max_chars: usize) -> Result<Self, SpeechError> {
        let cleaned: String = text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

        if cleaned.is_empty() {
            return Err(SpeechError::Utterance("Text cannot be empty".to_string()));
        }

        let length = cleaned.chars().count();
        if length > max_chars {
            return Err(SpeechError::Utterance(format!(
                "Text too long ({} chars, max {})",
                length, max_chars
            )));
        }

        Ok(Self(cleaned))
    }

    /// "<label> <distance> steps <direction>"
    pub fn from_cue(cue: &SpatialCue, max_chars: usize) -> Result<Self, SpeechError> {
        Self::new(&cue.to_string(), max_chars)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
