//! Error types for pathsense-eye

use pathsense_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Camera permission error: {0}")]
    Permission(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Detection error: {0}")]
    Detection(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<VisionError> for CoreError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::InvalidInput(msg) => CoreError::InvalidValue(msg),
            VisionError::Config(msg) => CoreError::Configuration(msg),
            VisionError::Io(e) => CoreError::Io(e),
            other => CoreError::Capability(format!("Vision error: {}", other)),
        }
    }
}
