use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned box in source-image pixels; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Intersection over union. Returns 0.0 for non-finite or negative-sized boxes.
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        if !self.is_finite() || !other.is_finite() {
            return 0.0;
        }
        if self.width < 0.0 || self.height < 0.0 || other.width < 0.0 || other.height < 0.0 {
            return 0.0;
        }

        let x_left = self.x.max(other.x);
        let y_top = self.y.max(other.y);
        let x_right = (self.x + self.width).min(other.x + other.width);
        let y_bottom = (self.y + self.height).min(other.y + other.height);

        if x_right <= x_left || y_bottom <= y_top {
            return 0.0;
        }

        let intersection = (x_right - x_left) * (y_bottom - y_top);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 || !union.is_finite() {
            return 0.0;
        }

        (intersection / union).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
        }
    }
}

/// One object instance reported for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionCandidate {
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
    pub image_size: ImageSize,
}

impl DetectionCandidate {
    pub fn new(
        label: impl Into<String>,
        confidence: f32,
        bbox: BoundingBox,
        image_size: ImageSize,
    ) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
            image_size,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        self.bbox.center()
    }
}

/// Where an obstacle sits relative to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Ahead,
    /// Not produced by image-based estimation.
    Behind,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Ahead => "ahead",
            Direction::Behind => "behind",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance/direction summary of a single detection.
///
/// Immutable once built. A new analysis produces a new cue rather than
/// updating an existing one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialCue {
    label: String,
    confidence: f32,
    distance: u32,
    direction: Direction,
}

impl SpatialCue {
    /// Distance is in steps and must be at least 1.
    pub fn new(
        label: impl Into<String>,
        confidence: f32,
        distance: u32,
        direction: Direction,
    ) -> Result<Self> {
        if distance == 0 {
            return Err(Error::InvalidValue(
                "cue distance must be at least one step".to_string(),
            ));
        }
        Ok(Self {
            label: label.into(),
            confidence,
            distance,
            direction,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Confidence as a whole percentage, for overlay text.
    pub fn confidence_percent(&self) -> u32 {
        if !self.confidence.is_finite() {
            return 0;
        }
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

impl fmt::Display for SpatialCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} steps {}", self.label, self.distance, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_center() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(bbox.center(), (50.0, 50.0));
        assert_eq!(bbox.area(), 10_000.0);
    }

    #[test]
    fn test_iou_identical() {
        let bbox = BoundingBox::new(10.0, 10.0, 50.0, 50.0);
        assert!((bbox.iou(&bbox) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_iou_disjoint() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 20.0, 10.0, 10.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_half_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 0.0, 10.0, 10.0);
        // 50 / 150
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_iou_rejects_nan() {
        let a = BoundingBox::new(f64::NAN, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_default_image_size() {
        let size = ImageSize::default();
        assert_eq!(size.width, 640.0);
        assert_eq!(size.height, 480.0);
    }

    #[test]
    fn test_direction_serde() {
        assert_eq!(serde_json::to_string(&Direction::Ahead).unwrap(), "\"ahead\"");
        let parsed: Direction = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(parsed, Direction::Left);
    }

    #[test]
    fn test_cue_display() {
        let cue = SpatialCue::new("chair", 0.9, 3, Direction::Left).unwrap();
        assert_eq!(cue.to_string(), "chair 3 steps left");
        assert_eq!(cue.confidence_percent(), 90);
    }

    #[test]
    fn test_cue_rejects_zero_distance() {
        assert!(SpatialCue::new("chair", 0.9, 0, Direction::Ahead).is_err());
    }
}
