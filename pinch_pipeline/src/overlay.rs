//! Hand-skeleton overlay.
//!
//! Drawn once per detection result, independent of gesture state.  Purely
//! visual feedback: nothing here influences placement.

use glam::Vec2;

use crate::landmark::{HandFrame, HAND_CONNECTIONS};

/// A 2D drawable region the size of the viewport.
pub trait OverlaySurface {
    /// Current size in pixels `(width, height)`.
    fn size(&self) -> (usize, usize);
    /// Erase everything, leaving the surface fully transparent.
    fn clear(&mut self);
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: u32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: u32);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    pub line_color:   u32,
    pub line_width:   f32,
    pub point_color:  u32,
    pub point_radius: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        OverlayStyle {
            line_color:   0xFF00FF00, // lime
            line_width:   3.0,
            point_color:  0xFFFF0000, // red
            point_radius: 6.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct OverlayRenderer {
    pub style: OverlayStyle,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle) -> Self {
        OverlayRenderer { style }
    }

    /// Clear, then draw the skeleton of `hand` if one was detected.
    pub fn render<S: OverlaySurface + ?Sized>(&self, surface: &mut S, hand: Option<&HandFrame>) {
        surface.clear();
        let Some(hand) = hand else { return };

        let (w, h) = surface.size();
        let pts = hand.landmarks();

        for &(a, b) in HAND_CONNECTIONS.iter() {
            surface.draw_line(
                pts[a].denormalize(w, h),
                pts[b].denormalize(w, h),
                self.style.line_width,
                self.style.line_color,
            );
        }
        for p in pts.iter() {
            surface.fill_circle(p.denormalize(w, h), self.style.point_radius, self.style.point_color);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Recording surface — test double
// ════════════════════════════════════════════════════════════════════════════
