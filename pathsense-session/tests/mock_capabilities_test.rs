//! Interaction expectations on the capabilities

use async_trait::async_trait;
use mockall::mock;
use pathsense_core::DetectionCandidate;
use pathsense_eye::{CameraCapability, DetectionCapability, FrameHandle, VisionError};
use pathsense_session::{AnalysisOutcome, FallbackReason, SessionConfig, SessionController};
use pathsense_spk::{SpeechCapability, SpeechError, VoiceConfig};
use std::sync::Arc;

mock! {
    pub Camera {}

    #[async_trait]
    impl CameraCapability for Camera {
        async fn request_permission(&self) -> Result<bool, VisionError>;
        async fn capture_frame(&self) -> Result<FrameHandle, VisionError>;
    }
}

mock! {
    pub Detector {}

    #[async_trait]
    impl DetectionCapability for Detector {
        fn available(&self) -> bool;
        async fn detect(&self, frame: &FrameHandle) -> Result<Vec<DetectionCandidate>, VisionError>;
    }
}

mock! {
    pub Speech {}

    #[async_trait]
    impl SpeechCapability for Speech {
        async fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), SpeechError>;
        fn cancel(&self);
        fn is_available(&self) -> bool;
    }
}

#[tokio::test]
async fn test_unavailable_model_never_calls_detect() {
    let mut camera = MockCamera::new();
    camera.expect_request_permission().times(1).returning(|| Ok(true));
    camera
        .expect_capture_frame()
        .times(1)
        .returning(|| Ok(FrameHandle::new(Vec::<u8>::new())));

    let mut detector = MockDetector::new();
    detector.expect_available().return_const(false);
    detector.expect_detect().never();

    let mut speech = MockSpeech::new();
    speech.expect_speak().never();
    speech.expect_is_available().return_const(true);

    let controller = SessionController::new(
        SessionConfig::default(),
        Arc::new(camera),
        Arc::new(detector),
        Arc::new(speech),
    )
    .unwrap();

    assert!(!controller.initialize().await);
    controller.request_permission().await.unwrap();
    controller.request_permission().await.unwrap();

    let outcome = controller.analyze().await.unwrap();
    assert_eq!(outcome, AnalysisOutcome::Fallback(FallbackReason::ModelUnavailable));
    assert!(controller.snapshot().active_candidates.is_empty());
}

#[tokio::test]
async fn test_stop_cancels_speech_once_per_call() {
    let camera = MockCamera::new();
    let mut detector = MockDetector::new();
    detector.expect_available().return_const(true);

    let mut speech = MockSpeech::new();
    speech.expect_cancel().times(2).return_const(());

    let controller = SessionController::new(
        SessionConfig::default(),
        Arc::new(camera),
        Arc::new(detector),
        Arc::new(speech),
    )
    .unwrap();

    controller.stop();
    controller.stop();
    assert!(!controller.snapshot().is_analyzing);
}
