//! Detection session controller
//!
//! One analyze cycle runs capture, detection, estimation and speech strictly
//! in order. Cycles never overlap: the `is_analyzing` latch is checked and
//! set under the state write lock. Every cycle gets a generation number;
//! `stop()` and each new cycle bump it, and a cycle whose generation is no
//! longer current discards its results without touching state or speaking.
//! `stop()` also publishes its generation on a watch channel, so an
//! announcement already under way is dropped even if the engine never saw
//! the cancel.
//!
//! The state lock is a `parking_lot::RwLock` and is never held across an
//! `.await`.

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::expiry::ResultExpiry;
use crate::state::{FallbackReason, SessionPhase, SessionState};
use parking_lot::RwLock;
use pathsense_core::SpatialCue;
use pathsense_eye::{
    CameraCapability, DetectionCapability, DetectionPipeline, SpatialEstimator, VisionError,
};
use pathsense_spk::{Announcer, SpeechCapability, SpeechError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, OnceCell};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyAnalyzing,
    PermissionNotGranted,
}

/// Result of one `analyze()` call.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// A new cue replaced the previous one
    Cue(SpatialCue),
    /// No cue; the previous one (if any) is kept
    Fallback(FallbackReason),
    /// Nothing was done
    Skipped(SkipReason),
    /// `stop()` or a newer cycle invalidated this one; its results were dropped
    Superseded,
}

pub struct SessionController {
    config: SessionConfig,
    camera: Arc<dyn CameraCapability>,
    pipeline: DetectionPipeline,
    estimator: SpatialEstimator,
    announcer: Announcer,
    state: Arc<RwLock<SessionState>>,
    generation: AtomicU64,
    stopped: watch::Sender<u64>,
    expiry: ResultExpiry,
    events: broadcast::Sender<SessionEvent>,
    initialized: OnceCell<bool>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        camera: Arc<dyn CameraCapability>,
        detector: Arc<dyn DetectionCapability>,
        speech: Arc<dyn SpeechCapability>,
    ) -> Result<Self, SessionError> {
        config.validate().map_err(SessionError::Config)?;

        let estimator = SpatialEstimator::from_config(&config.vision)?;
        let pipeline = DetectionPipeline::new(detector, config.vision.clone());
        let announcer = Announcer::new(speech, config.speech.clone())?;
        let (events, _) = broadcast::channel(config.event_buffer);
        let (stopped, _) = watch::channel(0);

        Ok(Self {
            config,
            camera,
            pipeline,
            estimator,
            announcer,
            state: Arc::new(RwLock::new(SessionState::default())),
            generation: AtomicU64::new(0),
            stopped,
            expiry: ResultExpiry::new(),
            events,
            initialized: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Load the detection model. Runs once; later calls return the first
    /// result. A failed load leaves the session ready in fallback mode.
    pub async fn initialize(&self) -> bool {
        let model_available = self
            .initialized
            .get_or_init(|| async move {
                let detector = self.pipeline.detector();
                let loaded = match detector.initialize().await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Failed to initialize {}: {}", detector.name(), e);
                        false
                    }
                };
                let available = loaded && detector.available();

                {
                    let mut state = self.state.write();
                    state.capability_ready = true;
                    state.model_available = available;
                }

                if available {
                    info!("Detection model {} ready", detector.name());
                } else {
                    info!("Detection model unavailable, running in fallback mode");
                }
                self.emit(SessionEvent::Initialized {
                    model_available: available,
                });
                available
            })
            .await;
        *model_available
    }

    /// Ask for camera access. Once granted it is never asked again.
    pub async fn request_permission(&self) -> Result<(), SessionError> {
        if self.state.read().permission_granted {
            return Ok(());
        }

        let granted = match self.camera.request_permission().await {
            Ok(granted) => granted,
            Err(e) => {
                warn!("Camera permission request failed: {}", e);
                false
            }
        };

        if !granted {
            info!("Camera permission denied");
            return Err(SessionError::PermissionDenied);
        }

        let newly_granted = {
            let mut state = self.state.write();
            let was_granted = state.permission_granted;
            state.permission_granted = true;
            !was_granted
        };

        if newly_granted {
            info!("Camera permission granted");
            self.emit(SessionEvent::PermissionGranted);
        }
        Ok(())
    }

    /// Run one analyze cycle.
    pub async fn analyze(&self) -> Result<AnalysisOutcome, SessionError> {
        let cycle = {
            let mut state = self.state.write();
            if state.is_analyzing {
                debug!("Analysis already in progress, ignoring request");
                return Ok(AnalysisOutcome::Skipped(SkipReason::AlreadyAnalyzing));
            }
            if !state.permission_granted {
                debug!("Camera permission not granted, ignoring request");
                return Ok(AnalysisOutcome::Skipped(SkipReason::PermissionNotGranted));
            }
            state.is_analyzing = true;
            state.phase = SessionPhase::Analyzing;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        let _guard = AnalyzingGuard {
            state: &self.state,
            generation: &self.generation,
            cycle,
        };

        debug!("Analysis cycle {} started", cycle);
        self.emit(SessionEvent::AnalysisStarted { cycle });

        let frame = match self.camera.capture_frame().await {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Frame capture failed in cycle {}: {}", cycle, e);
                return Ok(self.fallback(cycle, FallbackReason::CaptureFailed));
            }
        };
        if !self.is_current(cycle) {
            return Ok(AnalysisOutcome::Superseded);
        }

        if !self.state.read().model_available {
            return Ok(self.fallback(cycle, FallbackReason::ModelUnavailable));
        }

        let report = match self.pipeline.detect(&frame).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Detection failed in cycle {}: {}", cycle, e);
                return Ok(self.fallback(cycle, FallbackReason::DetectionFailed));
            }
        };
        if !self.is_current(cycle) {
            return Ok(AnalysisOutcome::Superseded);
        }

        let primary = match report.primary() {
            Some(primary) => primary,
            None => return Ok(self.fallback(cycle, FallbackReason::NoCandidates)),
        };

        let cue = self
            .estimator
            .estimate(primary, report.image_size.width, report.image_size.height)
            .map_err(|e| match e {
                VisionError::InvalidInput(msg) => SessionError::InvalidInput(msg),
                other => SessionError::Vision(other),
            })?;

        {
            let mut state = self.state.write();
            if self.generation.load(Ordering::SeqCst) != cycle {
                return Ok(AnalysisOutcome::Superseded);
            }
            state.last_cue = Some(cue.clone());
            state.active_candidates = report.candidates.clone();
            state.image_size = report.image_size;
            state.last_processing_time = Some(report.processing_time);
            state.last_fallback = None;
            self.arm_expiry();
        }

        info!(
            "Cycle {}: {} ({} detections, {:?})",
            cycle,
            cue,
            report.candidates.len(),
            report.processing_time
        );
        self.emit(SessionEvent::CueReady {
            cycle,
            cue: cue.clone(),
        });

        if self.config.announce_results {
            // Both read before the generation check, so a stop() landing
            // anywhere after it is observed.
            let epoch = self.announcer.cancel_epoch();
            let mut stopped = self.stopped.subscribe();
            if self.is_current(cycle) {
                let result = tokio::select! {
                    result = self.announcer.announce_since(&cue, epoch) => result,
                    _ = async { stopped.wait_for(|&generation| generation > cycle).await.is_ok() } => {
                        Err(SpeechError::Cancelled)
                    }
                };
                match result {
                    Ok(_) => {}
                    Err(SpeechError::Cancelled) => debug!("Announcement for cycle {} cancelled", cycle),
                    Err(e) => warn!("Failed to announce cue: {}", e),
                }
            }
        }

        Ok(AnalysisOutcome::Cue(cue))
    }

    /// Abandon the current cycle and silence speech. The last cue and its
    /// expiry timer are left alone.
    pub fn stop(&self) {
        let was_analyzing = {
            let mut state = self.state.write();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.stopped.send_replace(generation);
            let was_analyzing = state.is_analyzing;
            state.is_analyzing = false;
            state.phase = SessionPhase::Idle;
            was_analyzing
        };
        self.announcer.cancel();

        if was_analyzing {
            info!("Analysis stopped");
        }
        self.emit(SessionEvent::Stopped { was_analyzing });
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn status_line(&self) -> Option<String> {
        self.state.read().status_line()
    }

    pub fn mode_label(&self) -> &'static str {
        self.state.read().mode_label()
    }

    fn is_current(&self, cycle: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == cycle
    }

    fn fallback(&self, cycle: u64, reason: FallbackReason) -> AnalysisOutcome {
        {
            let mut state = self.state.write();
            if self.generation.load(Ordering::SeqCst) != cycle {
                return AnalysisOutcome::Superseded;
            }
            state.active_candidates.clear();
            state.last_fallback = Some(reason);
        }

        info!("Cycle {}: fallback ({})", cycle, reason);
        self.emit(SessionEvent::Fallback { cycle, reason });
        AnalysisOutcome::Fallback(reason)
    }

    /// Caller holds the state write lock.
    fn arm_expiry(&self) {
        let state = self.state.clone();
        let events = self.events.clone();
        self.expiry.arm(self.config.result_window(), move |ticket| {
            {
                let mut state = state.write();
                if !ticket.is_current() {
                    return;
                }
                state.last_cue = None;
                state.active_candidates.clear();
                if state.phase == SessionPhase::IdleWithResult {
                    state.phase = SessionPhase::Idle;
                }
            }
            debug!("Result expired (epoch {})", ticket.epoch());
            send_event(&events, SessionEvent::ResultExpired);
        });
    }

    fn emit(&self, event: SessionEvent) {
        send_event(&self.events, event);
    }
}

fn send_event(events: &broadcast::Sender<SessionEvent>, event: SessionEvent) {
    if events.send(event).is_err() {
        debug!("No session event subscribers");
    }
}

/// Clears `is_analyzing` when a cycle ends, however it ends, unless a newer
/// cycle or `stop()` has taken over.
struct AnalyzingGuard<'a> {
    state: &'a RwLock<SessionState>,
    generation: &'a AtomicU64,
    cycle: u64,
}

impl Drop for AnalyzingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != self.cycle {
            return;
        }
        if !state.is_analyzing {
            error!("Cycle {} finished but session was not analyzing", self.cycle);
        }
        state.is_analyzing = false;
        state.phase = state.resting_phase();
    }
}
