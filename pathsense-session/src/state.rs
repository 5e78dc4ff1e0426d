//! Session state owned by the controller

use pathsense_core::{DetectionCandidate, ImageSize, SpatialCue};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

pub const REAL_DETECTION_LABEL: &str = "Real detection";
pub const FALLBACK_MODE_LABEL: &str = "Fallback mode (no false detections)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Idle,
    Analyzing,
    IdleWithResult,
    IdleWithFallback,
}

/// Why a cycle produced no cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FallbackReason {
    /// No model loaded; the detector was not called
    ModelUnavailable,
    CaptureFailed,
    DetectionFailed,
    /// Detector ran and reported nothing usable
    NoCandidates,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::ModelUnavailable => "model unavailable",
            FallbackReason::CaptureFailed => "capture failed",
            FallbackReason::DetectionFailed => "detection failed",
            FallbackReason::NoCandidates => "no candidates",
        };
        f.write_str(text)
    }
}

/// Everything the screen needs to render. Callers get clones via
/// `SessionController::snapshot`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub permission_granted: bool,
    pub is_analyzing: bool,
    pub last_cue: Option<SpatialCue>,
    /// Confidence-descending; empty after a fallback or once the result expires
    pub active_candidates: Vec<DetectionCandidate>,
    pub capability_ready: bool,
    pub model_available: bool,
    /// Size of the last analysed image
    pub image_size: ImageSize,
    pub phase: SessionPhase,
    /// Set by a fallback, cleared by the next successful cycle
    pub last_fallback: Option<FallbackReason>,
    pub last_processing_time: Option<Duration>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            permission_granted: false,
            is_analyzing: false,
            last_cue: None,
            active_candidates: Vec::new(),
            capability_ready: false,
            model_available: false,
            image_size: ImageSize::default(),
            phase: SessionPhase::Idle,
            last_fallback: None,
            last_processing_time: None,
        }
    }
}

impl SessionState {
    /// "Last detected: chair 3 steps left"
    pub fn status_line(&self) -> Option<String> {
        self.last_cue
            .as_ref()
            .map(|cue| format!("Last detected: {}", cue))
    }

    pub fn mode_label(&self) -> &'static str {
        if self.model_available {
            REAL_DETECTION_LABEL
        } else {
            FALLBACK_MODE_LABEL
        }
    }

    pub(crate) fn resting_phase(&self) -> SessionPhase {
        if self.last_fallback.is_some() {
            SessionPhase::IdleWithFallback
        } else if self.last_cue.is_some() {
            SessionPhase::IdleWithResult
        } else {
            SessionPhase::Idle
        }
    }
}
