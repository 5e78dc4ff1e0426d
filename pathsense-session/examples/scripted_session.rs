//! Example: scripted scene-analysis session
//!
//! Drives the session controller with a scripted camera and detector:
//! 1. The model loads and camera permission is granted
//! 2. Three analyze cycles run: a chair, an empty frame, a person
//! 3. The result window expires
//!
//! Cues are logged instead of spoken unless PATHSENSE_NATIVE_SPEECH is set,
//! in which case espeak-ng / say is used.
//!
//! Run with: RUST_LOG=info cargo run --example scripted_session --package pathsense-session

use async_trait::async_trait;
use parking_lot::Mutex;
use pathsense_core::{BoundingBox, DetectionCandidate, ImageSize};
use pathsense_eye::{class_label, CameraCapability, DetectionCapability, FrameHandle, VisionError};
use pathsense_session::{SessionConfig, SessionController, SessionEvent};
use pathsense_spk::{CustomSpeechEngine, NativeSpeechEngine, SpeechCapability};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct DemoCamera;

#[async_trait]
impl CameraCapability for DemoCamera {
    async fn request_permission(&self) -> Result<bool, VisionError> {
        Ok(true)
    }

    async fn capture_frame(&self) -> Result<FrameHandle, VisionError> {
        Ok(FrameHandle::from_uri("demo://frame").with_size(ImageSize::new(640.0, 480.0)))
    }
}

/// Replays (class id, score, x, y, w, h) detections, one frame per call.
struct DemoDetector {
    frames: Mutex<VecDeque<Vec<(usize, f32, f64, f64, f64, f64)>>>,
}

#[async_trait]
impl DetectionCapability for DemoDetector {
    fn available(&self) -> bool {
        true
    }

    async fn detect(&self, frame: &FrameHandle) -> Result<Vec<DetectionCandidate>, VisionError> {
        tokio::time::sleep(Duration::from_millis(150)).await;
        let size = frame.size.unwrap_or_default();
        let detections = self.frames.lock().pop_front().unwrap_or_default();
        Ok(detections
            .into_iter()
            .filter_map(|(class_id, score, x, y, w, h)| {
                class_label(class_id)
                    .map(|label| DetectionCandidate::new(label, score, BoundingBox::new(x, y, w, h), size))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "demo"
    }
}

async fn speech_engine(config: &SessionConfig) -> anyhow::Result<Arc<dyn SpeechCapability>> {
    if std::env::var("PATHSENSE_NATIVE_SPEECH").is_ok() {
        return Ok(Arc::new(NativeSpeechEngine::new(&config.speech).await?));
    }
    Ok(Arc::new(CustomSpeechEngine::new(
        "log",
        |text, voice| {
            info!("[speech:{}] {}", voice.language, text);
            Ok(())
        },
        || {},
        || true,
    )))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    info!("=== Scripted Session Example ===");

    let mut config = SessionConfig::from_env();
    config.result_window_ms = 1500;

    let detector = DemoDetector {
        frames: Mutex::new(VecDeque::from(vec![
            // chair (56) near the left edge, plus a faint cup (41)
            vec![(56, 0.91, 0.0, 0.0, 100.0, 100.0), (41, 0.15, 400.0, 300.0, 30.0, 30.0)],
            Vec::new(),
            // person (0) filling the right side
            vec![(0, 0.84, 420.0, 40.0, 200.0, 420.0)],
        ])),
    };

    let controller = SessionController::new(
        config.clone(),
        Arc::new(DemoCamera),
        Arc::new(detector),
        speech_engine(&config).await?,
    )?;

    let mut events = controller.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!("event: {}", serde_json::to_string(&event).unwrap_or_default());
            if event == SessionEvent::ResultExpired {
                break;
            }
        }
    });

    controller.initialize().await;
    info!("Mode: {}", controller.mode_label());
    controller.request_permission().await?;

    for _ in 0..3 {
        let outcome = controller.analyze().await?;
        info!("Outcome: {:?}", outcome);
        if let Some(status) = controller.status_line() {
            info!("{}", status);
        }
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    tokio::time::sleep(config.result_window() + Duration::from_millis(200)).await;
    info!("After window: {:?}", controller.snapshot().last_cue);

    controller.stop();
    let _ = printer.await;
    Ok(())
}
