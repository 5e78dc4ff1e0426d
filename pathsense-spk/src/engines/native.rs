//! Native platform speech via the system command-line synthesizer
//! Linux: espeak-ng, macOS: `say`

use crate::config::{SpeechConfig, VoiceConfig};
use crate::engines::SpeechCapability;
use crate::error::SpeechError;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::Notify;
use tracing::{debug, warn};

/// Words per minute both synthesizers treat as normal speed
const BASE_WPM: f32 = 175.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Synthesizer {
    EspeakNg,
    Say,
}

impl Synthesizer {
    /// Synthesizer conventionally present on the current platform.
    pub fn for_platform() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Synthesizer::Say)
        } else if cfg!(target_os = "linux") {
            Some(Synthesizer::EspeakNg)
        } else {
            None
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            Synthesizer::EspeakNg => "espeak-ng",
            Synthesizer::Say => "say",
        }
    }
}

/// Speaks through a platform synthesizer process. One utterance at a time;
/// `cancel` kills the running process.
pub struct NativeSpeechEngine {
    synthesizer: Option<Synthesizer>,
    available: bool,
    rate: f32,
    pitch: f32,
    volume: f32,
    cancel: Notify,
}

impl NativeSpeechEngine {
    /// Validates the config and checks for the platform synthesizer.
    pub async fn new(config: &SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let synthesizer = Synthesizer::for_platform();
        let available = match synthesizer {
            Some(synthesizer) => is_installed(synthesizer).await,
            None => false,
        };
        if !available {
            warn!("No command-line speech synthesizer found; speech output disabled");
        }

        Ok(Self {
            synthesizer,
            available,
            rate: config.rate,
            pitch: config.pitch,
            volume: config.volume,
            cancel: Notify::new(),
        })
    }

    pub fn synthesizer(&self) -> Option<Synthesizer> {
        self.synthesizer
    }

    /// Arguments passed to the synthesizer for one utterance.
    pub fn command_args(&self, synthesizer: Synthesizer, text: &str, voice: &VoiceConfig) -> Vec<String> {
        let wpm = ((BASE_WPM * self.rate).round() as u32).clamp(80, 500);
        let mut args = vec!["-r".to_string(), wpm.to_string()];

        match synthesizer {
            Synthesizer::EspeakNg => {
                args[0] = "-s".to_string();
                // espeak-ng pitch is 0-99 with 50 as default
                let pitch = ((self.pitch * 50.0).round() as u32).min(99);
                args.push("-p".to_string());
                args.push(pitch.to_string());
                // espeak-ng amplitude is 0-200 with 100 as default
                let amplitude = ((self.volume * 100.0).round() as u32).min(200);
                args.push("-a".to_string());
                args.push(amplitude.to_string());
                args.push("-v".to_string());
                args.push(voice.name.clone().unwrap_or_else(|| voice.language.clone()));
            }
            Synthesizer::Say => {
                // `say` has no pitch or volume flags
                if let Some(ref name) = voice.name {
                    args.push("-v".to_string());
                    args.push(name.clone());
                }
            }
        }

        args.push("--".to_string());
        args.push(text.to_string());
        args
    }
}

async fn is_installed(synthesizer: Synthesizer) -> bool {
    let flag = match synthesizer {
        Synthesizer::EspeakNg => "--version",
        Synthesizer::Say => "-v?",
    };
    match Command::new(synthesizer.program())
        .arg(flag)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
    {
        Ok(status) => status.success(),
        Err(e) => {
            debug!("{} not usable: {}", synthesizer.program(), e);
            false
        }
    }
}

#[async_trait]
impl SpeechCapability for NativeSpeechEngine {
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), SpeechError> {
        let synthesizer = match self.synthesizer {
            Some(s) if self.available => s,
            _ => return Err(SpeechError::Engine("No speech synthesizer available".to_string())),
        };

        if text.trim().is_empty() {
            return Err(SpeechError::Utterance("Text cannot be empty".to_string()));
        }

        // Register for cancellation before the process exists so an early
        // cancel is not lost.
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();

        let mut child = Command::new(synthesizer.program())
            .args(self.command_args(synthesizer, text, voice))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Engine(format!("Failed to run {}: {}", synthesizer.program(), e)))?;

        debug!("Speaking via {}: {:?}", synthesizer.program(), text);

        tokio::select! {
            status = child.wait() => {
                let status = status?;
                if status.success() {
                    Ok(())
                } else {
                    Err(SpeechError::Engine(format!(
                        "{} exited with {}",
                        synthesizer.program(),
                        status
                    )))
                }
            }
            _ = &mut cancelled => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to stop {}: {}", synthesizer.program(), e);
                }
                Err(SpeechError::Cancelled)
            }
        }
    }

    fn cancel(&self) {
        self.cancel.notify_waiters();
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        self.synthesizer.map(|s| s.program()).unwrap_or("native")
    }
}
