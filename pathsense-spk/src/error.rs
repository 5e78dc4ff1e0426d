//! Error types for pathsense-spk

use pathsense_core::Error as CoreError;
use thiserror::Error;

/// Speech output errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Invalid utterance: {0}")]
    Utterance(String),

    #[error("Speech cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SpeechError> for CoreError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Config(msg) => CoreError::Configuration(msg),
            SpeechError::Io(e) => CoreError::Io(e),
            other => CoreError::Capability(format!("Speech error: {}", other)),
        }
    }
}
