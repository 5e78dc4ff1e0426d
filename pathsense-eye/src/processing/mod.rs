//! Detection post-processing

pub mod detection;
pub mod nms;

pub use detection::{DetectionPipeline, DetectionReport};
pub use nms::{apply_nms, sort_by_confidence};
