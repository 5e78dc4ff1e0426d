//! Announces spatial cues through a speech engine

use crate::config::SpeechConfig;
use crate::engines::SpeechCapability;
use crate::error::SpeechError;
use crate::utterance::Utterance;
use pathsense_core::SpatialCue;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Applies the speech configuration on top of a `SpeechCapability`.
///
/// Every `cancel()` bumps a cancellation epoch. Callers that may be cancelled
/// before speech begins read `cancel_epoch()` first and pass it to
/// `announce_since`, which refuses to start the engine once the epoch moved.
pub struct Announcer {
    engine: Arc<dyn SpeechCapability>,
    config: SpeechConfig,
    cancel_epoch: AtomicU64,
}

impl Announcer {
    pub fn new(engine: Arc<dyn SpeechCapability>, config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;
        Ok(Self {
            engine,
            config,
            cancel_epoch: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<dyn SpeechCapability> {
        &self.engine
    }

    /// Speak a cue. Returns `Ok(false)` when speech is disabled or the
    /// engine reports itself unavailable.
    pub async fn announce(&self, cue: &SpatialCue) -> Result<bool, SpeechError> {
        self.announce_since(cue, self.cancel_epoch()).await
    }

    /// Like `announce`, but fails with `SpeechError::Cancelled` if `cancel()`
    /// ran after `epoch` was read.
    pub async fn announce_since(&self, cue: &SpatialCue, epoch: u64) -> Result<bool, SpeechError> {
        let utterance = Utterance::from_cue(cue, self.config.max_utterance_chars)?;
        self.say_since(&utterance, epoch).await
    }

    pub async fn say(&self, utterance: &Utterance) -> Result<bool, SpeechError> {
        self.say_since(utterance, self.cancel_epoch()).await
    }

    async fn say_since(&self, utterance: &Utterance, epoch: u64) -> Result<bool, SpeechError> {
        if !self.config.enabled {
            debug!("Speech disabled, not announcing {:?}", utterance.as_str());
            return Ok(false);
        }

        if !self.engine.is_available() {
            debug!("Speech engine {} unavailable", self.engine.name());
            return Ok(false);
        }

        if self.cancel_epoch() != epoch {
            debug!("Announcement cancelled before speaking");
            return Err(SpeechError::Cancelled);
        }

        self.engine.speak(utterance.as_str(), &self.config.voice).await?;
        Ok(true)
    }

    pub fn cancel_epoch(&self) -> u64 {
        self.cancel_epoch.load(Ordering::SeqCst)
    }

    /// Stop any utterance in progress and any announcement that has not
    /// reached the engine yet.
    pub fn cancel(&self) {
        self.cancel_epoch.fetch_add(1, Ordering::SeqCst);
        self.engine.cancel();
    }
}
