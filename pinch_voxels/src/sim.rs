//! Simulated camera and hand detector (always available).
//!
//! The visualizer window forwards mouse/keyboard state as [`SimInput`]
//! events; [`SimCamera`] turns the latest state into frames at the configured
//! capture rate, and [`SimDetector`] "infers" a 21-landmark hand whose index
//! fingertip follows the pointer.  Everything downstream sees exactly what a
//! real landmark model would deliver.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use pinch_pipeline::{CaptureConfig, FrameSource, HandDetector, HandFrame, Landmark, ScoredHand, LANDMARK_COUNT};
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// SimInput
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the visualizer window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position in normalized window coordinates, `None` when the
    /// pointer left the window.
    Pointer(Option<Vec2>),
    /// Pinch held (left mouse button or Space).
    Pinch(bool),
    /// Show/hide the simulated hand.
    ToggleHand,
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// SimCamera
// ════════════════════════════════════════════════════════════════════════════

/// One simulated capture, in capture-pixel space.
#[derive(Clone, Debug, PartialEq)]
pub struct SimFrame {
    pub width:      u32,
    pub height:     u32,
    /// Index fingertip position in pixels, `None` when no hand is in view.
    pub pointer_px: Option<Vec2>,
    pub pinched:    bool,
}

pub struct SimCamera {
    rx:           Receiver<SimInput>,
    config:       CaptureConfig,
    pointer:      Option<Vec2>,
    pinched:      bool,
    hand_visible: bool,
    last_frame:   Option<Instant>,
}

impl SimCamera {
    pub fn new(rx: Receiver<SimInput>, config: CaptureConfig) -> Self {
        SimCamera {
            rx,
            config,
            pointer:      None,
            pinched:      false,
            hand_visible: true,
            last_frame:   None,
        }
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.config.fps.max(1)
    }

    /// Apply pending input.  Returns false once the session should end.
    fn drain_input(&mut self) -> bool {
        loop {
            match self.rx.try_recv() {
                Ok(SimInput::Pointer(p)) => self.pointer = p,
                Ok(SimInput::Pinch(on))  => self.pinched = on,
                Ok(SimInput::ToggleHand) => {
                    self.hand_visible = !self.hand_visible;
                    debug!(visible = self.hand_visible, "simulated hand toggled");
                }
                Ok(SimInput::Quit) | Err(TryRecvError::Disconnected) => return false,
                Err(TryRecvError::Empty) => return true,
            }
        }
    }

    fn snapshot(&self) -> SimFrame {
        let (w, h) = (self.config.width, self.config.height);
        let pointer_px = self
            .pointer
            .filter(|_| self.hand_visible)
            .filter(|p| (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y))
            .map(|p| Vec2::new(p.x * w as f32, p.y * h as f32));
        SimFrame { width: w, height: h, pointer_px, pinched: self.pinched }
    }
}

impl FrameSource for SimCamera {
    type Frame = SimFrame;

    fn next_frame(&mut self) -> anyhow::Result<Option<SimFrame>> {
        if let Some(last) = self.last_frame {
            let due = last + self.frame_interval();
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }
        }
        self.last_frame = Some(Instant::now());

        if !self.drain_input() {
            return Ok(None);
        }
        Ok(Some(self.snapshot()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimDetector
// ════════════════════════════════════════════════════════════════════════════

/// Right-hand pose at 640×480, as pixel offsets from the index fingertip.
const OPEN_HAND_PX: [(f32, f32); LANDMARK_COUNT] = [
    ( 30.0, 170.0),                                                 // wrist
    ( -5.0, 150.0), (-30.0, 125.0), (-50.0, 100.0), (-65.0, 75.0),  // thumb
    (  5.0,  80.0), (  3.0,  50.0), (  1.0,  22.0), (  0.0,  0.0),  // index
    ( 30.0,  78.0), ( 32.0,  45.0), ( 33.0,  20.0), ( 34.0, -3.0),  // middle
    ( 52.0,  85.0), ( 56.0,  57.0), ( 58.0,  35.0), ( 60.0, 15.0),  // ring
    ( 72.0,  97.0), ( 78.0,  77.0), ( 82.0,  62.0), ( 85.0, 48.0),  // pinky
];

/// Thumb tip offset while pinching.
const PINCHED_THUMB_TIP_PX: (f32, f32) = (-4.0, 3.0);
const REFERENCE_HEIGHT: f32 = 480.0;

#[derive(Clone, Debug, Default)]
pub struct SimDetector;

impl SimDetector {
    /// Synthesize the landmarks for a hand whose index tip is at `tip` (pixels).
    pub fn synthesize(&self, frame: &SimFrame, tip: Vec2) -> HandFrame {
        let scale = frame.height as f32 / REFERENCE_HEIGHT;
        let mut offsets = OPEN_HAND_PX;
        if frame.pinched {
            let (mx, my) = offsets[2];
            let (tx, ty) = PINCHED_THUMB_TIP_PX;
            offsets[3] = ((mx + tx) * 0.5, (my + ty) * 0.5);
            offsets[4] = PINCHED_THUMB_TIP_PX;
        }
        let (w, h) = (frame.width.max(1) as f32, frame.height.max(1) as f32);
        let pts: [Landmark; LANDMARK_COUNT] = std::array::from_fn(|i| {
            let (dx, dy) = offsets[i];
            Landmark::new((tip.x + dx * scale) / w, (tip.y + dy * scale) / h)
        });
        HandFrame::new(pts)
    }
}

impl HandDetector for SimDetector {
    type Frame = SimFrame;

    fn detect(&mut self, frame: &SimFrame) -> anyhow::Result<Vec<ScoredHand>> {
        Ok(frame
            .pointer_px
            .map(|tip| ScoredHand { landmarks: self.synthesize(frame, tip), score: 1.0 })
            .into_iter()
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
