//! # pinch_voxels
//!
//! Desktop front end for [`pinch_pipeline`]: pinch thumb and index finger
//! together in front of the capture device and a voxel appears in the 3D
//! scene at the matching spot.
//!
//! ## Layout
//!
//! * [`canvas`] — ARGB software framebuffer; implements `OverlaySurface`.
//! * [`viewport`] — perspective camera and the grid/voxel rasterizer.
//! * [`sim`] — mouse-driven frame source and synthetic hand detector.
//! * [`leap`] — LeapMotion frame source and detector.
//! * [`visualizer`] — `minifb` window: viewport, overlay, status bar.
//! * [`app`] — configuration, per-detection state and the display loop.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse pointer is the index
//!   fingertip; hold the left button (or `Space`) to pinch.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse move | Move the hand |
//! | Left button / `Space` | Pinch |
//! | `H` | Hide / show the hand |
//! | `Q` / `Escape` | Quit |

pub mod canvas;
pub mod viewport;
pub mod sim;
pub mod leap;
pub mod visualizer;
pub mod app;
