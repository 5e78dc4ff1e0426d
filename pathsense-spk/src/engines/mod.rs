//! Speech engine implementations

pub mod custom;
pub mod native;

use crate::config::VoiceConfig;
use crate::error::SpeechError;
use async_trait::async_trait;

/// Speech output as seen by the session.
///
/// `speak` resolves when the utterance has finished playing. `cancel` stops
/// whatever is currently being spoken; the pending `speak` then resolves
/// with `SpeechError::Cancelled` (or `Ok` if the engine cannot tell).
#[async_trait]
pub trait SpeechCapability: Send + Sync {
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), SpeechError>;

    fn cancel(&self);

    fn is_available(&self) -> bool;

    fn name(&self) -> &str {
        "speech"
    }
}
