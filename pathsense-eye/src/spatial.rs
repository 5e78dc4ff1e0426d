//! Spatial estimation: bounding box to distance in steps and direction
//!
//! Distance is a coarse heuristic on the share of the image the box covers:
//! `round(10 / (relative_area * 20))`, clamped to `1..=MAX_DISTANCE_STEPS`.
//! Direction compares the normalized horizontal center of the box against
//! two thresholds. Comparisons are strict, so a center exactly on a
//! threshold is "ahead".
//!
//! `Direction::Behind` is never produced here; a single forward-facing
//! image carries no information about what is behind the user.

use crate::config::VisionConfig;
use crate::error::VisionError;
use pathsense_core::{DetectionCandidate, Direction, SpatialCue};

pub const LEFT_THRESHOLD: f64 = 0.3;
pub const RIGHT_THRESHOLD: f64 = 0.7;
pub const MAX_DISTANCE_STEPS: u32 = 99;

/// Estimate a cue with the default thresholds.
pub fn estimate(
    candidate: &DetectionCandidate,
    image_width: f64,
    image_height: f64,
) -> Result<SpatialCue, VisionError> {
    SpatialEstimator::default().estimate(candidate, image_width, image_height)
}

/// Steps for a box covering `relative_area` of the image.
/// Zero, negative or non-finite areas map to the cap.
pub fn distance_steps(relative_area: f64) -> u32 {
    if !relative_area.is_finite() || relative_area <= 0.0 {
        return MAX_DISTANCE_STEPS;
    }
    let steps = (10.0 / (relative_area * 20.0)).round();
    if !steps.is_finite() || steps >= MAX_DISTANCE_STEPS as f64 {
        return MAX_DISTANCE_STEPS;
    }
    (steps as u32).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEstimator {
    left_threshold: f64,
    right_threshold: f64,
}

impl Default for SpatialEstimator {
    fn default() -> Self {
        Self {
            left_threshold: LEFT_THRESHOLD,
            right_threshold: RIGHT_THRESHOLD,
        }
    }
}

impl SpatialEstimator {
    pub fn new(left_threshold: f64, right_threshold: f64) -> Result<Self, VisionError> {
        if !left_threshold.is_finite()
            || !right_threshold.is_finite()
            || left_threshold < 0.0
            || right_threshold > 1.0
            || left_threshold > right_threshold
        {
            return Err(VisionError::Config(format!(
                "Invalid direction thresholds: left={}, right={}",
                left_threshold, right_threshold
            )));
        }
        Ok(Self {
            left_threshold,
            right_threshold,
        })
    }

    pub fn from_config(config: &VisionConfig) -> Result<Self, VisionError> {
        Self::new(config.left_threshold, config.right_threshold)
    }

    pub fn left_threshold(&self) -> f64 {
        self.left_threshold
    }

    pub fn right_threshold(&self) -> f64 {
        self.right_threshold
    }

    /// Direction for a horizontal center normalized to the image width.
    pub fn direction(&self, center_x: f64) -> Direction {
        if center_x < self.left_threshold {
            Direction::Left
        } else if center_x > self.right_threshold {
            Direction::Right
        } else {
            Direction::Ahead
        }
    }

    pub fn estimate(
        &self,
        candidate: &DetectionCandidate,
        image_width: f64,
        image_height: f64,
    ) -> Result<SpatialCue, VisionError> {
        if !image_width.is_finite() || !image_height.is_finite() || image_width <= 0.0 || image_height <= 0.0 {
            return Err(VisionError::InvalidInput(format!(
                "Image dimensions must be positive, got {}x{}",
                image_width, image_height
            )));
        }

        let bbox = &candidate.bbox;
        if !bbox.is_finite() {
            return Err(VisionError::InvalidInput(format!(
                "Bounding box for '{}' has non-finite coordinates",
                candidate.label
            )));
        }

        let (center_x, _) = bbox.center();
        let direction = self.direction(center_x / image_width);

        let relative_area = bbox.area() / (image_width * image_height);
        let distance = distance_steps(relative_area);

        SpatialCue::new(candidate.label.clone(), candidate.confidence, distance, direction)
            .map_err(|e| VisionError::InvalidInput(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathsense_core::{BoundingBox, ImageSize};

    fn candidate(x: f64, y: f64, width: f64, height: f64) -> DetectionCandidate {
        DetectionCandidate::new(
            "chair",
            0.9,
            BoundingBox::new(x, y, width, height),
            ImageSize::default(),
        )
    }

    #[test]
    fn test_small_box_top_left() {
        let cue = estimate(&candidate(0.0, 0.0, 100.0, 100.0), 640.0, 480.0).unwrap();
        assert_eq!(cue.direction(), Direction::Left);
        assert_eq!(cue.distance(), 15);
        assert_eq!(cue.label(), "chair");
        assert_eq!(cue.to_string(), "chair 15 steps left");
    }

    #[test]
    fn test_center_just_past_right_threshold() {
        // center 450 / 640 = 0.703125
        let cue = estimate(&candidate(300.0, 200.0, 300.0, 300.0), 640.0, 480.0).unwrap();
        assert_eq!(cue.direction(), Direction::Right);
        assert_eq!(cue.distance(), 2);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // centers at exactly 0.3 and 0.7 of a 1000px image
        let left_edge = estimate(&candidate(200.0, 0.0, 200.0, 100.0), 1000.0, 1000.0).unwrap();
        assert_eq!(left_edge.direction(), Direction::Ahead);
        let right_edge = estimate(&candidate(600.0, 0.0, 200.0, 100.0), 1000.0, 1000.0).unwrap();
        assert_eq!(right_edge.direction(), Direction::Ahead);
    }

    #[test]
    fn test_full_frame_is_one_step() {
        let cue = estimate(&candidate(0.0, 0.0, 640.0, 480.0), 640.0, 480.0).unwrap();
        assert_eq!(cue.distance(), 1);
        assert_eq!(cue.direction(), Direction::Ahead);
    }

    #[test]
    fn test_zero_area_hits_cap() {
        let cue = estimate(&candidate(320.0, 240.0, 0.0, 0.0), 640.0, 480.0).unwrap();
        assert_eq!(cue.distance(), MAX_DISTANCE_STEPS);
    }

    #[test]
    fn test_distance_steps_rounding() {
        // 0.5 / 0.2 = 2.5 rounds away from zero
        assert_eq!(distance_steps(0.2), 3);
        assert_eq!(distance_steps(1.0), 1);
        assert_eq!(distance_steps(4.0), 1);
        assert_eq!(distance_steps(0.0001), MAX_DISTANCE_STEPS);
        assert_eq!(distance_steps(f64::NAN), MAX_DISTANCE_STEPS);
    }

    #[test]
    fn test_invalid_image_dimensions() {
        let c = candidate(0.0, 0.0, 10.0, 10.0);
        assert!(matches!(estimate(&c, 0.0, 480.0), Err(VisionError::InvalidInput(_))));
        assert!(matches!(estimate(&c, 640.0, -1.0), Err(VisionError::InvalidInput(_))));
        assert!(matches!(estimate(&c, f64::INFINITY, 480.0), Err(VisionError::InvalidInput(_))));
    }

    #[test]
    fn test_non_finite_bbox() {
        let c = candidate(f64::NAN, 0.0, 10.0, 10.0);
        assert!(matches!(estimate(&c, 640.0, 480.0), Err(VisionError::InvalidInput(_))));
    }

    #[test]
    fn test_custom_thresholds() {
        let estimator = SpatialEstimator::new(0.4, 0.6).unwrap();
        assert_eq!(estimator.direction(0.35), Direction::Left);
        assert_eq!(estimator.direction(0.5), Direction::Ahead);
        assert_eq!(estimator.direction(0.65), Direction::Right);
    }

    #[test]
    fn test_invalid_thresholds() {
        assert!(SpatialEstimator::new(0.8, 0.2).is_err());
        assert!(SpatialEstimator::new(-0.1, 0.7).is_err());
        assert!(SpatialEstimator::new(0.3, f64::NAN).is_err());
    }
}
