//! Top-level application: configuration, session state and the display loop.
//!
//! Two producers drive the app.  The capture thread delivers one
//! [`Detection`] per inference; the display loop on the main thread drains
//! them into the [`Session`] (in arrival order, one at a time) and redraws the
//! scene at the window's refresh rate, independently of detection cadence.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use pinch_pipeline::{
    CaptureConfig, CaptureHandle, CaptureLoop, Detection, DetectorConfig, OverlaySurface,
    PipelineConfig, Session, TrackingState,
};
use tracing::{debug, info, warn};

use crate::sim::SimInput;
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where hands come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Mouse/keyboard driven simulator.
    Simulated,
    /// LeapMotion controller (requires the `leap` feature).
    Leap,
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub pipeline:      PipelineConfig,
    pub capture:       CaptureConfig,
    pub detector:      DetectorConfig,
    pub backend:       Backend,
    pub window_width:  usize,
    pub window_height: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            pipeline:      PipelineConfig::default(),
            capture:       CaptureConfig::default(),
            detector:      DetectorConfig::default(),
            backend:       Backend::Simulated,
            window_width:  1024,
            window_height: 768,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    session:    Session,
    detections: u64,
    /// Smoothed detections per second.
    detection_rate: f32,
    last_detection: Option<Instant>,
    /// Capture-to-handle delay of the latest detection.
    last_latency:   Option<Duration>,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        AppState {
            session:        Session::new(cfg.pipeline),
            detections:     0,
            detection_rate: 0.0,
            last_detection: None,
            last_latency:   None,
        }
    }

    /// The detection callback: one inference result, handled at `now`.
    pub fn handle_detection<S: OverlaySurface + ?Sized>(
        &mut self,
        detection: Detection,
        now: Instant,
        overlay: &mut S,
    ) {
        if let Some(prev) = self.last_detection {
            let dt = now.saturating_duration_since(prev).as_secs_f32();
            if dt > 0.0 {
                self.detection_rate = self.detection_rate * 0.9 + (1.0 / dt) * 0.1;
            }
        }
        self.last_detection = Some(now);
        self.detections += 1;

        let latency = now.saturating_duration_since(detection.captured_at);
        self.last_latency = Some(latency);
        debug!(
            sequence = detection.sequence,
            latency_ms = latency.as_secs_f32() * 1000.0,
            "detection received"
        );

        self.session.on_detection(detection.hand.as_ref(), now, overlay);
    }

    pub fn session(&self) -> &Session { &self.session }
    pub fn detections(&self) -> u64 { self.detections }
    pub fn last_latency(&self) -> Option<Duration> { self.last_latency }

    pub fn status_line(&self) -> String {
        let hand = match self.session.tracking() {
            TrackingState::NoHand                     => "NO HAND",
            TrackingState::Hand { pinching: false }   => "OPEN",
            TrackingState::Hand { pinching: true }    => "PINCH",
        };
        let dist = self
            .session
            .last_pinch_distance()
            .map(|d| format!("{:.3}", d))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "VOXELS: {}   HAND: {}   DIST: {}   DET/S: {:.0}",
            self.session.placements(), hand, dist, self.detection_rate
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the display loop
// ════════════════════════════════════════════════════════════════════════════

fn start_capture(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> anyhow::Result<CaptureHandle> {
    match cfg.backend {
        Backend::Simulated => Ok(CaptureLoop::start(
            crate::sim::SimCamera::new(sim_rx, cfg.capture),
            crate::sim::SimDetector,
            cfg.detector,
        )),
        #[cfg(feature = "leap")]
        Backend::Leap => Ok(CaptureLoop::start(
            crate::leap::LeapCamera::open()?,
            crate::leap::LeapDetector::default(),
            cfg.detector,
        )),
        #[cfg(not(feature = "leap"))]
        Backend::Leap => anyhow::bail!("built without LeapMotion support; rebuild with `--features leap`"),
    }
}

/// Run the full application until the window closes or the user quits.
pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let sim_tx = (cfg.backend == Backend::Simulated).then_some(sim_tx);

    let mut capture = start_capture(&cfg, sim_rx)?;
    let mut vis = Visualizer::new(cfg.window_width, cfg.window_height, sim_tx)?;
    let mut app = AppState::new(&cfg);

    info!(
        backend = ?cfg.backend,
        capture_width = cfg.capture.width,
        capture_height = cfg.capture.height,
        "session started"
    );

    let result = loop {
        if !vis.is_open() || !vis.poll_input() {
            break Ok(());
        }
        vis.sync_size();

        let mut lost = false;
        loop {
            match capture.receiver().try_recv() {
                Ok(d) => app.handle_detection(d, Instant::now(), vis.overlay_mut()),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    lost = true;
                    break;
                }
            }
        }
        if lost {
            break Err(anyhow::anyhow!("capture stopped unexpectedly"));
        }

        if let Err(e) = vis.render(app.session().scene(), &app.status_line()) {
            warn!("{e:#}");
        }
    };

    drop(vis);
    capture.stop();
    info!(
        voxels = app.session().placements(),
        detections = app.detections(),
        "session ended"
    );
    result
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, TRANSPARENT};
    use crate::sim::{SimDetector, SimFrame};
    use glam::Vec2;
    use pinch_pipeline::{HandDetector, HandSelector};

    fn make_app() -> AppState {
        AppState::new(&AppConfig::default())
    }

    /// Run a simulated frame through detector and selector, as the capture
    /// thread would.
    fn detect(pointer: Option<Vec2>, pinched: bool, at: Instant) -> Detection {
        let frame = SimFrame { width: 640, height: 480, pointer_px: pointer, pinched };
        let mut selector = HandSelector::new(DetectorConfig::default());
        let hand = selector.select(SimDetector.detect(&frame).unwrap());
        Detection { hand, captured_at: at, sequence: 0 }
    }

    #[test]
    fn pinch_places_voxel_under_pointer() {
        let mut app = make_app();
        let mut overlay = Canvas::new(64, 48, TRANSPARENT);
        let t0 = Instant::now();
        // (480/640 - 0.5) * 10 = 2.5 → 3 ; (0.5 - 120/480) * 10 = 2.5 → 3
        app.handle_detection(detect(Some(Vec2::new(480.0, 120.0)), true, t0), t0, &mut overlay);
        let voxels = app.session().scene().voxels();
        assert_eq!(voxels.len(), 1);
        assert_eq!(voxels[0].position, glam::IVec3::new(3, 3, 0));
    }

    #[test]
    fn held_pinch_is_debounced() {
        let mut app = make_app();
        let mut overlay = Canvas::new(64, 48, TRANSPARENT);
        let t0 = Instant::now();
        let tip = Some(Vec2::new(320.0, 240.0));
        for i in 0..30u64 {
            let t = t0 + Duration::from_millis(i * 33);
            app.handle_detection(detect(tip, true, t), t, &mut overlay);
        }
        // 0 … 957 ms: accepted at 0 and 528.
        assert_eq!(app.session().placements(), 2);
        assert_eq!(app.detections(), 30);
    }

    #[test]
    fn open_hand_draws_overlay_only() {
        let mut app = make_app();
        let mut overlay = Canvas::new(64, 48, TRANSPARENT);
        let t0 = Instant::now();
        app.handle_detection(detect(Some(Vec2::new(320.0, 240.0)), false, t0), t0, &mut overlay);
        assert_eq!(app.session().placements(), 0);
        assert!(overlay.pixels().iter().any(|&p| p != TRANSPARENT));
    }

    #[test]
    fn no_hand_clears_overlay() {
        let mut app = make_app();
        let mut overlay = Canvas::new(64, 48, TRANSPARENT);
        let t0 = Instant::now();
        app.handle_detection(detect(Some(Vec2::new(320.0, 240.0)), false, t0), t0, &mut overlay);
        app.handle_detection(detect(None, false, t0), t0 + Duration::from_millis(33), &mut overlay);
        assert!(overlay.pixels().iter().all(|&p| p == TRANSPARENT));
        assert!(app.status_line().contains("NO HAND"));
    }

    #[test]
    fn status_line_reports_state() {
        let mut app = make_app();
        let mut overlay = Canvas::new(64, 48, TRANSPARENT);
        let t0 = Instant::now();
        assert!(app.status_line().starts_with("VOXELS: 0"));
        app.handle_detection(detect(Some(Vec2::new(100.0, 100.0)), true, t0), t0, &mut overlay);
        let s = app.status_line();
        assert!(s.starts_with("VOXELS: 1"), "{s}");
        assert!(s.contains("PINCH"), "{s}");
    }

    #[test]
    fn latency_measured_from_capture() {
        let mut app = make_app();
        let mut overlay = Canvas::new(64, 48, TRANSPARENT);
        let captured = Instant::now();
        assert_eq!(app.last_latency(), None);
        let handled = captured + Duration::from_millis(40);
        app.handle_detection(detect(None, false, captured), handled, &mut overlay);
        assert_eq!(app.last_latency(), Some(Duration::from_millis(40)));
        // A clock that runs behind the capture thread reads as zero delay.
        app.handle_detection(detect(None, false, handled), captured, &mut overlay);
        assert_eq!(app.last_latency(), Some(Duration::ZERO));
    }

    #[cfg(not(feature = "leap"))]
    #[test]
    fn leap_backend_requires_feature() {
        let cfg = AppConfig { backend: Backend::Leap, ..AppConfig::default() };
        let (_tx, rx) = mpsc::channel();
        assert!(start_capture(&cfg, rx).is_err());
    }
}
