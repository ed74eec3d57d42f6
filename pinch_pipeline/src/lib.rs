//! # pinch_pipeline
//!
//! Turn a stream of hand-landmark detections into voxels placed in a scene.
//!
//! ## Data flow
//!
//! ```text
//! FrameSource ─▶ HandDetector ─▶ HandSelector ─▶ Detection
//!                                                   │
//!                      ┌────────────────────────────┴──────────────┐
//!                      ▼                                           ▼
//!              OverlayRenderer                            PinchClassifier
//!              (every result)                                   │
//!                                                          DebounceGate
//!                                                               │
//!                                                       CoordinateMapper
//!                                                               │
//!                                                         VoxelPlacer ─▶ Scene
//! ```
//!
//! Capture and inference run on their own thread ([`capture::CaptureLoop`]);
//! everything from [`session::Session::on_detection`] onward runs on the
//! thread that owns the session, one result at a time.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Instant;
//! use pinch_pipeline::landmark::{HandFrame, Joint, Landmark, LANDMARK_COUNT};
//! use pinch_pipeline::overlay::OverlaySurface;
//! use pinch_pipeline::session::Session;
//!
//! struct NoOverlay;
//! impl OverlaySurface for NoOverlay {
//!     fn size(&self) -> (usize, usize) { (640, 480) }
//!     fn clear(&mut self) {}
//!     fn draw_line(&mut self, _: glam::Vec2, _: glam::Vec2, _: f32, _: u32) {}
//!     fn fill_circle(&mut self, _: glam::Vec2, _: f32, _: u32) {}
//! }
//!
//! let mut pts = [Landmark::new(0.5, 0.8); LANDMARK_COUNT];
//! pts[Joint::IndexTip.index()] = Landmark::new(0.7, 0.3);
//! pts[Joint::ThumbTip.index()] = Landmark::new(0.69, 0.3);
//!
//! let mut session = Session::default();
//! session.on_detection(Some(&HandFrame::new(pts)), Instant::now(), &mut NoOverlay);
//! assert_eq!(session.placements(), 1);
//! ```

pub mod landmark;
pub mod gesture;
pub mod debounce;
pub mod mapper;
pub mod scene;
pub mod overlay;
pub mod capture;
pub mod session;

pub use capture::{
    CaptureConfig, CaptureHandle, CaptureLoop, Detection, DetectorConfig, FrameSource,
    HandDetector, HandSelector, ScoredHand,
};
pub use landmark::{HandFrame, Joint, Landmark, HAND_CONNECTIONS, LANDMARK_COUNT};
pub use overlay::{OverlayRenderer, OverlayStyle, OverlaySurface};
pub use scene::{Scene, Voxel};
pub use session::{PipelineConfig, Session, TrackingState};
