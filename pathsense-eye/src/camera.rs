//! Camera capability and captured frames

use crate::error::VisionError;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use pathsense_core::ImageSize;
use uuid::Uuid;

/// A captured frame. Opaque to the session; only detectors look inside.
#[derive(Debug, Clone)]
pub struct FrameHandle {
    pub id: Uuid,
    pub captured_at: DateTime<Utc>,
    /// Platform URI of the stored photo, when the camera writes one
    pub source_uri: Option<String>,
    pub size: Option<ImageSize>,
    pub payload: Bytes,
}

impl FrameHandle {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            id: Uuid::new_v4(),
            captured_at: Utc::now(),
            source_uri: None,
            size: None,
            payload: payload.into(),
        }
    }

    /// Frame backed only by a platform URI.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let mut frame = Self::new(Bytes::new());
        frame.source_uri = Some(uri.into());
        frame
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = Some(size);
        self
    }
}

/// Camera access as seen by the session.
#[async_trait]
pub trait CameraCapability: Send + Sync {
    /// Ask the platform for camera access. `Ok(false)` means the user declined.
    async fn request_permission(&self) -> Result<bool, VisionError>;

    /// Take one still frame.
    async fn capture_frame(&self) -> Result<FrameHandle, VisionError>;

    fn name(&self) -> &str {
        "camera"
    }
}
