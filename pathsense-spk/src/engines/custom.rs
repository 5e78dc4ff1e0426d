//! Closure-backed speech engine
//! Lets platform adapters plug in their own speech output

use crate::config::VoiceConfig;
use crate::engines::SpeechCapability;
use crate::error::SpeechError;
use async_trait::async_trait;
use std::sync::Arc;

type SpeakFn = Arc<dyn Fn(&str, &VoiceConfig) -> Result<(), SpeechError> + Send + Sync>;

/// Custom speech engine wrapper
pub struct CustomSpeechEngine {
    name: String,
    speak_fn: SpeakFn,
    cancel_fn: Arc<dyn Fn() + Send + Sync>,
    is_available_fn: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl CustomSpeechEngine {
    /// Create a new custom speech engine
    pub fn new<F1, F2, F3>(name: impl Into<String>, speak_fn: F1, cancel_fn: F2, is_available_fn: F3) -> Self
    where
        F1: Fn(&str, &VoiceConfig) -> Result<(), SpeechError> + Send + Sync + 'static,
        F2: Fn() + Send + Sync + 'static,
        F3: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            speak_fn: Arc::new(speak_fn),
            cancel_fn: Arc::new(cancel_fn),
            is_available_fn: Arc::new(is_available_fn),
        }
    }
}

#[async_trait]
impl SpeechCapability for CustomSpeechEngine {
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::Utterance("Text cannot be empty".to_string()));
        }

        if text.len() > 100_000 {
            return Err(SpeechError::Utterance("Text too long (max 100KB)".to_string()));
        }

        (self.speak_fn)(text, voice)
    }

    fn cancel(&self) {
        (self.cancel_fn)()
    }

    fn is_available(&self) -> bool {
        (self.is_available_fn)()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
