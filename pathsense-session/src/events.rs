//! Session events broadcast to subscribers

use crate::state::FallbackReason;
use pathsense_core::SpatialCue;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Initialized { model_available: bool },
    PermissionGranted,
    AnalysisStarted { cycle: u64 },
    CueReady { cycle: u64, cue: SpatialCue },
    Fallback { cycle: u64, reason: FallbackReason },
    ResultExpired,
    Stopped { was_analyzing: bool },
}
