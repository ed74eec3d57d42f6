//! The per-result detection callback.
//!
//! `Session` owns everything that must outlive a single frame (the debounce
//! timestamp and the scene) and wires the stages together:
//!
//! ```text
//! Detection ─┬─▶ OverlayRenderer                      (every result)
//!            └─▶ PinchClassifier ─▶ DebounceGate ─▶ CoordinateMapper ─▶ VoxelPlacer
//!                (only when a hand is present)
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::debounce::{DebounceGate, DEFAULT_COOLDOWN};
use crate::gesture::{PinchClassifier, DEFAULT_PINCH_THRESHOLD};
use crate::landmark::{HandFrame, Joint};
use crate::mapper::{CoordinateMapper, DEFAULT_SPAN};
use crate::overlay::{OverlayRenderer, OverlaySurface};
use crate::scene::{Scene, Voxel, VoxelPlacer, DEFAULT_VOXEL_COLOR, DEFAULT_VOXEL_SIZE};

// ════════════════════════════════════════════════════════════════════════════
// PipelineConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineConfig {
    pub pinch_threshold: f32,
    pub cooldown:        Duration,
    pub span:            f32,
    pub voxel_size:      f32,
    pub voxel_color:     u32,
    /// Optional cap on the number of placed voxels.
    pub voxel_capacity:  Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            cooldown:        DEFAULT_COOLDOWN,
            span:            DEFAULT_SPAN,
            voxel_size:      DEFAULT_VOXEL_SIZE,
            voxel_color:     DEFAULT_VOXEL_COLOR,
            voxel_capacity:  None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tracking state
// ════════════════════════════════════════════════════════════════════════════

/// Session-level view of the hand, as of the latest detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingState {
    NoHand,
    Hand { pinching: bool },
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

pub struct Session {
    classifier: PinchClassifier,
    gate:       DebounceGate,
    mapper:     CoordinateMapper,
    placer:     VoxelPlacer,
    overlay:    OverlayRenderer,
    scene:      Scene,
    tracking:   TrackingState,
    /// Pinch distance of the latest detected hand, for diagnostics.
    last_pinch_distance: Option<f32>,
}

impl Session {
    pub fn new(cfg: PipelineConfig) -> Self {
        let scene = match cfg.voxel_capacity {
            Some(limit) => Scene::with_capacity_limit(limit),
            None        => Scene::new(),
        };
        Session {
            classifier: PinchClassifier::new(cfg.pinch_threshold),
            gate:       DebounceGate::new(cfg.cooldown),
            mapper:     CoordinateMapper::new(cfg.span),
            placer:     VoxelPlacer { size: cfg.voxel_size, color: cfg.voxel_color },
            overlay:    OverlayRenderer::default(),
            scene,
            tracking:   TrackingState::NoHand,
            last_pinch_distance: None,
        }
    }

    /// Handle one inference result.
    ///
    /// The overlay is redrawn unconditionally.  Without a hand nothing else
    /// runs; with one, a debounced pinch places a voxel under the index tip.
    /// Returns the voxel placed by this result, if any.
    pub fn on_detection<S: OverlaySurface + ?Sized>(
        &mut self,
        hand: Option<&HandFrame>,
        now: Instant,
        overlay: &mut S,
    ) -> Option<Voxel> {
        self.overlay.render(overlay, hand);

        let Some(hand) = hand else {
            self.transition(TrackingState::NoHand);
            self.last_pinch_distance = None;
            return None;
        };

        let distance = self.classifier.pinch_distance(hand);
        let pinching = self.classifier.is_pinching(hand);
        self.last_pinch_distance = Some(distance);
        self.transition(TrackingState::Hand { pinching });

        if !self.gate.accept(pinching, now) {
            return None;
        }

        let tip = hand.landmark(Joint::IndexTip);
        let world = self.mapper.map(&tip);
        let voxel = self.placer.place(&mut self.scene, world)?;
        info!(
            x = voxel.position.x,
            y = voxel.position.y,
            z = voxel.position.z,
            total = self.scene.len(),
            "placed voxel"
        );
        Some(voxel)
    }

    fn transition(&mut self, next: TrackingState) {
        if self.tracking != next {
            debug!("tracking {:?} → {:?}", self.tracking, next);
            self.tracking = next;
        }
    }

    pub fn scene(&self) -> &Scene { &self.scene }
    pub fn tracking(&self) -> TrackingState { self.tracking }
    pub fn placements(&self) -> usize { self.scene.len() }
    pub fn last_pinch_distance(&self) -> Option<f32> { self.last_pinch_distance }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(PipelineConfig::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
