//! LeapMotion backend.
//!
//! [`LeapDetector`] and [`InteractionBox`] are plain data transforms and are
//! always compiled; [`LeapCamera`], which talks to the device through LeapC,
//! requires the `leap` feature and the LeapC shared library.
//!
//! Leap reports joints in millimetres above the device (x right, y up,
//! z toward the user).  The interaction box maps the useful tracking volume
//! onto the normalized image-style coordinates the pipeline expects.

use pinch_pipeline::{HandDetector, HandFrame, Landmark, ScoredHand, LANDMARK_COUNT};
use tracing::warn;

/// Joint positions of one tracked hand, in landmark order, millimetres.
#[derive(Clone, Debug, PartialEq)]
pub struct LeapHand {
    pub joints: [[f32; 3]; LANDMARK_COUNT],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeapFrame {
    pub hands: Vec<LeapHand>,
}

// ════════════════════════════════════════════════════════════════════════════
// InteractionBox
// ════════════════════════════════════════════════════════════════════════════

/// The part of the device's field of view mapped onto `[0, 1]²`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionBox {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Default for InteractionBox {
    fn default() -> Self {
        InteractionBox { x_min: -200.0, x_max: 200.0, y_min: 100.0, y_max: 500.0 }
    }
}

impl InteractionBox {
    /// Device millimetres → normalized landmark (y flipped so up is 0).
    pub fn normalize(&self, p: [f32; 3]) -> Landmark {
        let x = (p[0] - self.x_min) / (self.x_max - self.x_min);
        let y = (p[1] - self.y_min) / (self.y_max - self.y_min);
        Landmark::new(x, 1.0 - y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapDetector
// ════════════════════════════════════════════════════════════════════════════

/// The device does the tracking; "detection" is only the coordinate change.
#[derive(Clone, Debug, Default)]
pub struct LeapDetector {
    pub interaction: InteractionBox,
}

impl HandDetector for LeapDetector {
    type Frame = LeapFrame;

    fn detect(&mut self, frame: &LeapFrame) -> anyhow::Result<Vec<ScoredHand>> {
        Ok(frame
            .hands
            .iter()
            .map(|h| ScoredHand {
                landmarks: HandFrame::new(h.joints.map(|j| self.interaction.normalize(j))),
                score: 1.0,
            })
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Polling
// ════════════════════════════════════════════════════════════════════════════

/// One device poll, reduced to what the frame source acts on.
#[derive(Clone, Debug, PartialEq)]
pub enum LeapPoll {
    Tracking(LeapFrame),
    /// Nothing arrived within the poll timeout.
    Timeout,
    Failed(String),
    /// Connection, device and policy events.
    Other,
}

/// Poll until a tracking frame arrives or the device goes quiet.
///
/// A timeout or failed poll yields an empty frame (no hand), so the capture
/// loop returns to its stop check at least once per poll timeout.
pub fn next_leap_frame(mut poll: impl FnMut() -> LeapPoll) -> LeapFrame {
    loop {
        match poll() {
            LeapPoll::Tracking(frame) => return frame,
            LeapPoll::Timeout => return LeapFrame::default(),
            LeapPoll::Failed(e) => {
                warn!("LeapC poll failed: {e}");
                return LeapFrame::default();
            }
            LeapPoll::Other => continue,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapCamera — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "leap")]
pub use device::LeapCamera;

#[cfg(feature = "leap")]
mod device {
    use anyhow::anyhow;
    use leaprs::*;
    use std::thread;
    use std::time::Duration;

    use pinch_pipeline::FrameSource;
    use tracing::info;

    use super::{next_leap_frame, LeapFrame, LeapHand, LeapPoll};

    /// Pause after a failed poll, which returns immediately, before polling again.
    const ERROR_BACKOFF: Duration = Duration::from_millis(100);

    /// Frame source backed by a LeapMotion controller.
    ///
    /// Landmark 0 is taken from the palm centre; for each digit the four
    /// landmarks are the far joints of the metacarpal, proximal, intermediate
    /// and distal bones.  The thumb's metacarpal has zero length in Leap's
    /// model, which makes landmark 1 coincide with the thumb base.
    pub struct LeapCamera {
        connection: Connection,
    }

    impl LeapCamera {
        pub fn open() -> anyhow::Result<Self> {
            let mut connection = Connection::create(ConnectionConfig::default())
                .map_err(|e| anyhow!("failed to create LeapC connection: {e:?}"))?;
            connection
                .open()
                .map_err(|e| anyhow!("failed to open LeapMotion device: {e:?}"))?;
            info!("LeapMotion connection open");
            Ok(LeapCamera { connection })
        }

        fn poll_once(&mut self) -> LeapPoll {
            let msg = match self.connection.poll(100) {
                Ok(m) => m,
                Err(Error::Timeout) => return LeapPoll::Timeout,
                Err(e) => {
                    thread::sleep(ERROR_BACKOFF);
                    return LeapPoll::Failed(format!("{e:?}"));
                }
            };
            let Event::Tracking(frame) = msg.event() else {
                return LeapPoll::Other;
            };
            let hands = frame.hands().map(|hand| {
                let palm = hand.palm().position();
                let mut joints = [[palm.x, palm.y, palm.z]; super::LANDMARK_COUNT];
                for (d, digit) in hand.digits().enumerate().take(5) {
                    let bones = [
                        digit.metacarpal().next_joint(),
                        digit.proximal().next_joint(),
                        digit.intermediate().next_joint(),
                        digit.distal().next_joint(),
                    ];
                    for (b, j) in bones.iter().enumerate() {
                        joints[1 + d * 4 + b] = [j.x, j.y, j.z];
                    }
                }
                LeapHand { joints }
            });
            LeapPoll::Tracking(LeapFrame { hands: hands.collect() })
        }
    }

    impl FrameSource for LeapCamera {
        type Frame = LeapFrame;

        fn next_frame(&mut self) -> anyhow::Result<Option<LeapFrame>> {
            Ok(Some(next_leap_frame(|| self.poll_once())))
        }
    }
}
