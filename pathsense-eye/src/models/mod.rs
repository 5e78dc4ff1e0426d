//! Detection capability and label tables

pub mod coco;

pub use coco::{class_label, COCO_CLASSES};

use crate::camera::FrameHandle;
use crate::error::VisionError;
use async_trait::async_trait;
use pathsense_core::DetectionCandidate;

/// Object detector as seen by the session.
///
/// `available()` reports whether a model is loaded. Callers skip `detect`
/// entirely when it is false, so an unavailable detector is distinct from
/// one whose `detect` fails.
#[async_trait]
pub trait DetectionCapability: Send + Sync {
    /// Load model weights. Called once before the first `detect`.
    async fn initialize(&self) -> Result<(), VisionError> {
        Ok(())
    }

    fn available(&self) -> bool;

    async fn detect(&self, frame: &FrameHandle) -> Result<Vec<DetectionCandidate>, VisionError>;

    fn name(&self) -> &str {
        "detector"
    }
}
