//! Configuration for pathsense-eye

use pathsense_core::ImageSize;
use serde::{Deserialize, Serialize};

/// Vision pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Candidates scoring below this are dropped
    pub min_score: f32,
    /// Upper bound on candidates kept per frame
    pub max_detections: usize,
    /// IoU above which a lower-scoring box of the same label is suppressed.
    /// 1.0 disables suppression.
    pub nms_iou_threshold: f64,
    /// Image size assumed when neither candidates nor frame report one
    pub default_image_size: ImageSize,
    /// Normalized center x below which an object is "left"
    pub left_threshold: f64,
    /// Normalized center x above which an object is "right"
    pub right_threshold: f64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            min_score: 0.2,
            max_detections: 20,
            nms_iou_threshold: 0.5,
            default_image_size: ImageSize::default(),
            left_threshold: crate::spatial::LEFT_THRESHOLD,
            right_threshold: crate::spatial::RIGHT_THRESHOLD,
        }
    }
}

impl VisionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_score.is_finite() || !(0.0..=1.0).contains(&self.min_score) {
            return Err("min_score must be between 0.0 and 1.0".to_string());
        }

        if self.max_detections == 0 || self.max_detections > 1000 {
            return Err("max_detections must be between 1 and 1000".to_string());
        }

        if !self.nms_iou_threshold.is_finite()
            || self.nms_iou_threshold <= 0.0
            || self.nms_iou_threshold > 1.0
        {
            return Err("nms_iou_threshold must be in (0.0, 1.0]".to_string());
        }

        let size = &self.default_image_size;
        if !size.width.is_finite() || !size.height.is_finite() || size.width <= 0.0 || size.height <= 0.0 {
            return Err("default_image_size must be positive".to_string());
        }

        if !self.left_threshold.is_finite() || !self.right_threshold.is_finite() {
            return Err("Direction thresholds must be finite".to_string());
        }

        if self.left_threshold < 0.0 || self.right_threshold > 1.0 || self.left_threshold > self.right_threshold {
            return Err("Direction thresholds must satisfy 0 <= left <= right <= 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = VisionConfig::default();
        assert_eq!(config.min_score, 0.2);
        assert_eq!(config.max_detections, 20);
        assert_eq!(config.nms_iou_threshold, 0.5);
        assert_eq!(config.default_image_size, ImageSize::new(640.0, 480.0));
        assert_eq!(config.left_threshold, 0.3);
        assert_eq!(config.right_threshold, 0.7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_min_score() {
        let mut config = VisionConfig::default();
        config.min_score = 1.5;
        assert!(config.validate().is_err());

        config.min_score = f32::NAN;
        assert!(config.validate().is_err());

        config.min_score = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_max_detections() {
        let mut config = VisionConfig::default();
        config.max_detections = 0;
        assert!(config.validate().is_err());

        config.max_detections = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_nms() {
        let mut config = VisionConfig::default();
        config.nms_iou_threshold = 0.0;
        assert!(config.validate().is_err());

        config.nms_iou_threshold = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_thresholds() {
        let mut config = VisionConfig::default();
        config.left_threshold = 0.8;
        assert!(config.validate().is_err());

        config.left_threshold = -0.1;
        assert!(config.validate().is_err());

        config.left_threshold = 0.5;
        config.right_threshold = 0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_image_size() {
        let mut config = VisionConfig::default();
        config.default_image_size = ImageSize::new(0.0, 480.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_partial_deserialize() {
        let config: VisionConfig = serde_json::from_str(r#"{"min_score": 0.5}"#).unwrap();
        assert_eq!(config.min_score, 0.5);
        assert_eq!(config.max_detections, 20);
    }
}
