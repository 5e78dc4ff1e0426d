//! pathsense-eye: vision side of pathsense
//!
//! Narrow capability traits for the camera and the object detector, the
//! detection pipeline that normalizes detector output (score filter,
//! confidence ordering, non-maximum suppression, max count), the COCO label
//! table, and the spatial estimator that turns a bounding box into a
//! distance in steps plus a direction.

pub mod camera;
pub mod config;
pub mod error;
pub mod models;
pub mod processing;
pub mod spatial;

pub use camera::{CameraCapability, FrameHandle};
pub use config::VisionConfig;
pub use error::VisionError;
pub use models::{class_label, DetectionCapability, COCO_CLASSES};
pub use processing::{DetectionPipeline, DetectionReport};
pub use spatial::{estimate, SpatialEstimator, LEFT_THRESHOLD, MAX_DISTANCE_STEPS, RIGHT_THRESHOLD};
