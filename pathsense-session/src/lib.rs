//! pathsense-session: the detection session controller
//!
//! Owns the session state of a scene-analysis screen. A user-triggered
//! analyze cycle captures one frame, runs detection, converts the primary
//! detection into a spoken distance/direction cue and keeps the result
//! visible for a fixed window. When detection is unavailable or fails the
//! controller takes the fallback path and reports nothing rather than
//! fabricating results.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod expiry;
pub mod state;

pub use config::SessionConfig;
pub use controller::{AnalysisOutcome, SessionController, SkipReason};
pub use error::SessionError;
pub use events::SessionEvent;
pub use expiry::{ExpiryTicket, ResultExpiry};
pub use state::{FallbackReason, SessionPhase, SessionState};
