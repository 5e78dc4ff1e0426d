// Format-agnostic configuration loading shared by the pathsense crates

use crate::error::Error;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Parse a configuration document, trying JSON, then TOML, then YAML.
pub fn parse_config<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    if let Ok(config) = serde_json::from_str::<T>(content) {
        return Ok(config);
    }

    if let Ok(config) = toml::from_str::<T>(content) {
        return Ok(config);
    }

    if let Ok(config) = serde_yaml::from_str::<T>(content) {
        return Ok(config);
    }

    Err(ConfigError::ParseError(
        "Unknown format (expected JSON, TOML or YAML)".to_string(),
    ))
}

/// Read and parse a configuration file.
/// SECURITY: rejects paths containing traversal sequences
pub fn read_config_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let display = path.to_string_lossy();

    if display.contains("..") || display.contains("//") || display.contains("\\\\") {
        return Err(ConfigError::IoError(format!(
            "Path traversal detected: '{}'",
            display
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", display, e)))?;
    parse_config(&content)
}

#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Configuration(err.to_string())
    }
}
