//! pathsense-spk: speech output for pathsense
//!
//! Provides the speech capability the session announces cues through,
//! utterance validation for the fixed cue template, an `Announcer` that
//! applies the speech configuration, and two engines: a closure-backed one
//! for platform adapters and a command-line one (espeak-ng on Linux, `say`
//! on macOS).

pub mod announcer;
pub mod config;
pub mod engines;
pub mod error;
pub mod utterance;

pub use announcer::Announcer;
pub use config::{SpeechConfig, VoiceConfig};
pub use engines::{custom::CustomSpeechEngine, native::NativeSpeechEngine, SpeechCapability};
pub use error::SpeechError;
pub use utterance::Utterance;
