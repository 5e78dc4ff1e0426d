//! Object detection pipeline

use super::nms::{apply_nms, sort_by_confidence};
use crate::camera::FrameHandle;
use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::models::DetectionCapability;
use pathsense_core::{DetectionCandidate, ImageSize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Normalized result of one detector run.
#[derive(Debug, Clone)]
pub struct DetectionReport {
    /// Confidence-descending; the first entry is the primary detection
    pub candidates: Vec<DetectionCandidate>,
    pub image_size: ImageSize,
    pub processing_time: Duration,
}

impl DetectionReport {
    pub fn primary(&self) -> Option<&DetectionCandidate> {
        self.candidates.first()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Object detection pipeline
pub struct DetectionPipeline {
    detector: Arc<dyn DetectionCapability>,
    config: VisionConfig,
}

impl DetectionPipeline {
    /// Create a new detection pipeline
    pub fn new(detector: Arc<dyn DetectionCapability>, config: VisionConfig) -> Self {
        Self { detector, config }
    }

    pub fn detector(&self) -> &Arc<dyn DetectionCapability> {
        &self.detector
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    pub fn available(&self) -> bool {
        self.detector.available()
    }

    /// Run the detector on a frame and normalize its output.
    pub async fn detect(&self, frame: &FrameHandle) -> Result<DetectionReport, VisionError> {
        debug!("Running {} on frame {}", self.detector.name(), frame.id);
        let started = Instant::now();
        let raw = self.detector.detect(frame).await?;
        let raw_count = raw.len();

        let candidates = self.refine(raw);
        let image_size = self.resolve_image_size(&candidates, frame);
        let processing_time = started.elapsed();

        debug!(
            "Detected {} objects ({} raw) in {:?}",
            candidates.len(),
            raw_count,
            processing_time
        );

        Ok(DetectionReport {
            candidates,
            image_size,
            processing_time,
        })
    }

    /// Score filter, ordering, suppression and truncation.
    pub fn refine(&self, mut candidates: Vec<DetectionCandidate>) -> Vec<DetectionCandidate> {
        sort_by_confidence(&mut candidates);
        candidates.retain(|c| c.confidence >= self.config.min_score);
        let mut candidates = apply_nms(candidates, self.config.nms_iou_threshold);
        candidates.truncate(self.config.max_detections);
        candidates
    }

    /// The primary candidate's reported size is passed through unchecked so
    /// a bad size reaches the estimator. Frame and default sizes only stand
    /// in for an empty report.
    fn resolve_image_size(&self, candidates: &[DetectionCandidate], frame: &FrameHandle) -> ImageSize {
        match candidates.first() {
            Some(primary) => primary.image_size,
            None => frame
                .size
                .filter(is_usable)
                .unwrap_or(self.config.default_image_size),
        }
    }
}

fn is_usable(size: &ImageSize) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}
