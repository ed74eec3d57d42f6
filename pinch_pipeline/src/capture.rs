//! Capture and inference boundaries.
//!
//! A [`FrameSource`] acquires frames (a camera, a simulator, a tracking
//! device) and a [`HandDetector`] turns each frame into scored hand
//! candidates.  [`CaptureLoop`] runs the two on a dedicated thread as a
//! strictly sequential loop:
//!
//! ```text
//! acquire frame → detect (blocks) → select hand → send Detection
//! ```
//!
//! The blocking `detect` call is the only suspension point, so capture is
//! naturally throttled to inference throughput and results arrive in
//! submission order.  There is no frame queue and no timeout: a stalled
//! detector stalls capture.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, error, info};

use crate::landmark::HandFrame;

// ════════════════════════════════════════════════════════════════════════════
// Configuration
// ════════════════════════════════════════════════════════════════════════════

/// Frame acquisition parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureConfig {
    pub width:  u32,
    pub height: u32,
    /// Upper bound on acquisition rate; inference may make it lower.
    pub fps:    u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig { width: 640, height: 480, fps: 30 }
    }
}

/// Hand-landmark model parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    pub max_hands:                usize,
    /// Model size/accuracy trade-off, forwarded to backends that have one.
    pub model_complexity:         u8,
    /// Score needed to start tracking a hand.
    pub min_detection_confidence: f32,
    /// Score needed to keep tracking a hand seen in the previous frame.
    pub min_tracking_confidence:  f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            max_hands:                1,
            model_complexity:         1,
            min_detection_confidence: 0.7,
            min_tracking_confidence:  0.7,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Boundaries
// ════════════════════════════════════════════════════════════════════════════

/// A hand candidate reported by a detector.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredHand {
    pub landmarks: HandFrame,
    /// Detector confidence, 0.0–1.0.
    pub score:     f32,
}

/// Anything that can produce frames for inference.
pub trait FrameSource: Send + 'static {
    type Frame: Send + 'static;

    /// Acquire the next frame.  `Ok(None)` means the source has ended.
    fn next_frame(&mut self) -> anyhow::Result<Option<Self::Frame>>;
}

/// The inference boundary: frame in, zero or more hand candidates out.
pub trait HandDetector: Send + 'static {
    type Frame;

    fn detect(&mut self, frame: &Self::Frame) -> anyhow::Result<Vec<ScoredHand>>;
}

// ════════════════════════════════════════════════════════════════════════════
// HandSelector
// ════════════════════════════════════════════════════════════════════════════

/// Applies [`DetectorConfig`] to raw candidates.
///
/// While no hand is tracked a candidate must reach
/// `min_detection_confidence`; once one is tracked the bar becomes
/// `min_tracking_confidence`.  Of the survivors, the best `max_hands` are kept
/// and the pipeline consumes the first.
#[derive(Clone, Debug)]
pub struct HandSelector {
    config:   DetectorConfig,
    tracking: bool,
}

impl HandSelector {
    pub fn new(config: DetectorConfig) -> Self {
        HandSelector { config, tracking: false }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn select(&mut self, mut candidates: Vec<ScoredHand>) -> Option<HandFrame> {
        let min_score = if self.tracking {
            self.config.min_tracking_confidence
        } else {
            self.config.min_detection_confidence
        };
        candidates.retain(|c| c.score >= min_score);
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(self.config.max_hands);

        let best = candidates.into_iter().next().map(|c| c.landmarks);
        self.tracking = best.is_some();
        best
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Detection — one inference result delivered to the session
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Detection {
    pub hand:        Option<HandFrame>,
    /// When the frame was acquired.
    pub captured_at: Instant,
    /// Monotonic frame counter, starting at 0.
    pub sequence:    u64,
}

// ════════════════════════════════════════════════════════════════════════════
// CaptureLoop
// ════════════════════════════════════════════════════════════════════════════

pub struct CaptureLoop;

impl CaptureLoop {
    /// Spawn the capture thread and return a handle to its results.
    pub fn start<S, D>(source: S, detector: D, config: DetectorConfig) -> CaptureHandle
    where
        S: FrameSource,
        D: HandDetector<Frame = S::Frame>,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        info!(
            max_hands = config.max_hands,
            model_complexity = config.model_complexity,
            min_detection_confidence = config.min_detection_confidence,
            min_tracking_confidence = config.min_tracking_confidence,
            "starting capture loop"
        );
        let join = thread::spawn(move || run_loop(source, detector, HandSelector::new(config), tx, flag));
        CaptureHandle { rx, stop, join: Some(join) }
    }
}

fn run_loop<S, D>(
    mut source: S,
    mut detector: D,
    mut selector: HandSelector,
    tx: Sender<Detection>,
    stop: Arc<AtomicBool>,
) where
    S: FrameSource,
    D: HandDetector<Frame = S::Frame>,
{
    let mut sequence = 0u64;
    while !stop.load(Ordering::Relaxed) {
        let frame = match source.next_frame() {
            Ok(Some(f)) => f,
            Ok(None) => {
                info!(frames = sequence, "frame source ended");
                return;
            }
            Err(e) => {
                error!("frame acquisition failed: {e:#}");
                return;
            }
        };
        let captured_at = Instant::now();

        let candidates = match detector.detect(&frame) {
            Ok(c) => c,
            Err(e) => {
                error!("hand detection failed: {e:#}");
                return;
            }
        };
        let hand = selector.select(candidates);

        if tx.send(Detection { hand, captured_at, sequence }).is_err() {
            debug!("detection receiver dropped, stopping capture");
            return;
        }
        sequence += 1;
    }
    debug!(frames = sequence, "capture loop stopped");
}

/// Owner-side handle of a running [`CaptureLoop`].
pub struct CaptureHandle {
    rx:   Receiver<Detection>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl CaptureHandle {
    pub fn receiver(&self) -> &Receiver<Detection> {
        &self.rx
    }

    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    /// Ask the loop to stop before its next acquisition and wait for it.
    ///
    /// A loop blocked inside `next_frame` or `detect` is only joined once that
    /// call returns.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                error!("capture thread panicked");
            }
        }
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
