//! Error types for pathsense-session

use pathsense_core::Error as CoreError;
use pathsense_eye::VisionError;
use pathsense_spk::SpeechError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Vision error: {0}")]
    Vision(#[from] VisionError),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),
}

impl From<pathsense_core::ConfigError> for SessionError {
    fn from(err: pathsense_core::ConfigError) -> Self {
        SessionError::Config(err.to_string())
    }
}

impl From<SessionError> for CoreError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidInput(msg) => CoreError::InvalidValue(msg),
            SessionError::Config(msg) => CoreError::Configuration(msg),
            SessionError::Vision(e) => e.into(),
            SessionError::Speech(e) => e.into(),
            SessionError::PermissionDenied => CoreError::Capability("Camera permission denied".to_string()),
        }
    }
}
