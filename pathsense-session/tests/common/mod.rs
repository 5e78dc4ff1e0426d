//! Scripted capabilities shared by the session tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use pathsense_core::{BoundingBox, DetectionCandidate, ImageSize};
use pathsense_eye::{CameraCapability, DetectionCapability, FrameHandle, VisionError};
use pathsense_session::{SessionConfig, SessionController, SessionEvent};
use pathsense_spk::{SpeechCapability, SpeechError, VoiceConfig};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot, Notify};

pub fn candidate(label: &str, confidence: f32, x: f64, y: f64, w: f64, h: f64) -> DetectionCandidate {
    DetectionCandidate::new(
        label,
        confidence,
        BoundingBox::new(x, y, w, h),
        ImageSize::new(640.0, 480.0),
    )
}

/// Camera whose permission answers and captures are queued up front.
/// Empty queues grant permission and return a 640x480 frame.
#[derive(Default)]
pub struct ScriptedCamera {
    permissions: Mutex<VecDeque<Result<bool, VisionError>>>,
    captures: Mutex<VecDeque<Result<FrameHandle, VisionError>>>,
    pub permission_calls: AtomicUsize,
    pub capture_calls: AtomicUsize,
}

impl ScriptedCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_permission(&self, answer: Result<bool, VisionError>) {
        self.permissions.lock().push_back(answer);
    }

    pub fn push_capture(&self, frame: Result<FrameHandle, VisionError>) {
        self.captures.lock().push_back(frame);
    }
}

#[async_trait]
impl CameraCapability for ScriptedCamera {
    async fn request_permission(&self) -> Result<bool, VisionError> {
        self.permission_calls.fetch_add(1, Ordering::SeqCst);
        self.permissions.lock().pop_front().unwrap_or(Ok(true))
    }

    async fn capture_frame(&self) -> Result<FrameHandle, VisionError> {
        self.capture_calls.fetch_add(1, Ordering::SeqCst);
        self.captures
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(FrameHandle::new(vec![0u8; 16]).with_size(ImageSize::new(640.0, 480.0))))
    }
}

struct Step {
    result: Result<Vec<DetectionCandidate>, VisionError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Detector replaying queued results. A gated step blocks inside `detect`
/// until its sender fires or is dropped.
pub struct ScriptedDetector {
    available: bool,
    init_error: Mutex<Option<VisionError>>,
    steps: Mutex<VecDeque<Step>>,
    pub started: Notify,
    pub init_calls: AtomicUsize,
    pub detect_calls: AtomicUsize,
}

impl ScriptedDetector {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            init_error: Mutex::new(None),
            steps: Mutex::new(VecDeque::new()),
            started: Notify::new(),
            init_calls: AtomicUsize::new(0),
            detect_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_init(error: VisionError) -> Self {
        let detector = Self::new(true);
        *detector.init_error.lock() = Some(error);
        detector
    }

    pub fn push(&self, result: Result<Vec<DetectionCandidate>, VisionError>) {
        self.steps.lock().push_back(Step { result, gate: None });
    }

    pub fn push_gated(&self, result: Result<Vec<DetectionCandidate>, VisionError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.steps.lock().push_back(Step {
            result,
            gate: Some(rx),
        });
        tx
    }
}

#[async_trait]
impl DetectionCapability for ScriptedDetector {
    async fn initialize(&self) -> Result<(), VisionError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        match self.init_error.lock().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn available(&self) -> bool {
        self.available
    }

    async fn detect(&self, _frame: &FrameHandle) -> Result<Vec<DetectionCandidate>, VisionError> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().pop_front();
        self.started.notify_one();

        let Some(step) = step else {
            return Ok(Vec::new());
        };
        if let Some(gate) = step.gate {
            let _ = gate.await;
        }
        step.result
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Speech engine that records utterances. With `blocking` set, `speak` does
/// not finish until `cancel` is called.
#[derive(Default)]
pub struct RecordingSpeech {
    pub spoken: Mutex<Vec<String>>,
    pub cancels: AtomicUsize,
    pub speaking: Notify,
    blocking: bool,
    failing: bool,
    cancelled: Notify,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocking() -> Self {
        Self {
            blocking: true,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechCapability for RecordingSpeech {
    async fn speak(&self, text: &str, _voice: &VoiceConfig) -> Result<(), SpeechError> {
        if self.failing {
            return Err(SpeechError::Engine("audio device busy".to_string()));
        }
        self.spoken.lock().push(text.to_string());

        if self.blocking {
            let cancelled = self.cancelled.notified();
            tokio::pin!(cancelled);
            cancelled.as_mut().enable();
            self.speaking.notify_one();
            cancelled.await;
            return Err(SpeechError::Cancelled);
        }
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.cancelled.notify_waiters();
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "recording"
    }
}

pub struct Harness {
    pub controller: Arc<SessionController>,
    pub camera: Arc<ScriptedCamera>,
    pub detector: Arc<ScriptedDetector>,
    pub speech: Arc<RecordingSpeech>,
}

impl Harness {
    pub fn new(config: SessionConfig, detector: ScriptedDetector, speech: RecordingSpeech) -> Self {
        let camera = Arc::new(ScriptedCamera::new());
        let detector = Arc::new(detector);
        let speech = Arc::new(speech);
        let controller = SessionController::new(config, camera.clone(), detector.clone(), speech.clone())
            .expect("valid config");
        Self {
            controller: Arc::new(controller),
            camera,
            detector,
            speech,
        }
    }

    pub fn ready() -> Self {
        Self::new(SessionConfig::default(), ScriptedDetector::new(true), RecordingSpeech::new())
    }

    /// Initialize and grant permission.
    pub async fn start(&self) {
        self.controller.initialize().await;
        self.controller
            .request_permission()
            .await
            .expect("permission granted");
    }
}

/// Everything currently buffered on the receiver.
pub fn drain(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}
