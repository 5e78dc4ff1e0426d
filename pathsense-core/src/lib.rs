//! pathsense-core: shared types for spoken obstacle cues
//!
//! Holds the detection and cue types every other pathsense crate exchanges,
//! the core error type, and the multi-format config parsing helpers.

pub mod config;
pub mod error;
pub mod types;

pub use config::{parse_config, read_config_file, ConfigError};
pub use error::{Error, Result};
pub use types::{BoundingBox, DetectionCandidate, Direction, ImageSize, SpatialCue};
