//! `minifb` window: scene viewport, hand overlay, status bar.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                                                          │
//! │        3D viewport (grid + voxels)                       │
//! │             with the hand skeleton composited on top     │
//! │                                                          │
//! ├──────────────────────────────────────────────────────────┤
//! │ status line                                              │
//! │ key legend                                               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The overlay canvas is only cleared/redrawn when a detection result
//! arrives; the viewport is redrawn every refresh.

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::Context;
use glam::Vec2;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use pinch_pipeline::Scene;
use tracing::debug;

use crate::canvas::{Canvas, TRANSPARENT};
use crate::sim::SimInput;
use crate::viewport::{render_scene, ViewCamera};

const STATUS_H:     usize = 34;
const STATUS_BG:    u32   = 0xC00F3460;
const STATUS_TEXT:  u32   = 0xFFEEEEEE;
const LEGEND_TEXT:  u32   = 0xFF888888;
const SIM_LEGEND:  &str = "MOUSE=INDEX TIP  CLICK/SPACE=PINCH  H=HIDE HAND  Q/ESC=QUIT";
const LEAP_LEGEND: &str = "PINCH ABOVE THE LEAP DEVICE TO PLACE  Q/ESC=QUIT";

/// Key legend for the active hand source.
fn legend(simulated: bool) -> &'static str {
    if simulated { SIM_LEGEND } else { LEAP_LEGEND }
}

pub struct Visualizer {
    window:  Window,
    frame:   Canvas,
    overlay: Canvas,
    camera:  ViewCamera,
    /// `None` when the hand comes from hardware rather than the simulator.
    sim_tx:  Option<Sender<SimInput>>,

    last_pointer: Option<Vec2>,
    last_pinch:   bool,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, sim_tx: Option<Sender<SimInput>>) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "Pinch Voxels - pinch to place",
            width, height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        ).context("failed to open window")?;

        window.limit_update_rate(Some(Duration::from_micros(16_600))); // ~60fps

        let mut camera = ViewCamera::default();
        camera.set_viewport(width, height);

        Ok(Visualizer {
            window,
            frame:   Canvas::new(width, height, 0xFF000000),
            overlay: Canvas::new(width, height, TRANSPARENT),
            camera,
            sim_tx,
            last_pointer: None,
            last_pinch:   false,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// The surface the session draws the hand skeleton on.
    pub fn overlay_mut(&mut self) -> &mut Canvas { &mut self.overlay }

    fn send(&self, input: SimInput) {
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(input);
        }
    }

    /// Poll mouse/keyboard and forward changes as `SimInput`.
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            self.send(SimInput::Quit);
            return false;
        }
        if self.window.is_key_pressed(Key::H, KeyRepeat::No) {
            self.send(SimInput::ToggleHand);
        }

        let (w, h) = (self.frame.width().max(1) as f32, self.frame.height().max(1) as f32);
        let pointer = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Vec2::new(x / w, y / h));
        if pointer != self.last_pointer {
            self.last_pointer = pointer;
            self.send(SimInput::Pointer(pointer));
        }

        let pinch = self.window.get_mouse_down(MouseButton::Left)
                 || self.window.is_key_down(Key::Space);
        if pinch != self.last_pinch {
            self.last_pinch = pinch;
            self.send(SimInput::Pinch(pinch));
        }

        true
    }

    /// Follow window resizes: both canvases and the camera aspect.
    pub fn sync_size(&mut self) {
        let (w, h) = self.window.get_size();
        if (w, h) == (self.frame.width(), self.frame.height()) || w == 0 || h == 0 {
            return;
        }
        debug!(width = w, height = h, "viewport resized");
        self.frame.resize(w, h, 0xFF000000);
        self.overlay.resize(w, h, TRANSPARENT);
        self.camera.set_viewport(w, h);
    }

    /// Redraw the scene, composite the overlay, draw the status bar, present.
    pub fn render(&mut self, scene: &Scene, status: &str) -> anyhow::Result<()> {
        render_scene(scene, &self.camera, &mut self.frame);
        self.frame.blend_over(&self.overlay);
        draw_status(&mut self.frame, status, legend(self.sim_tx.is_some()));

        self.window
            .update_with_buffer(self.frame.pixels(), self.frame.width(), self.frame.height())
            .context("failed to present frame")
    }
}

fn draw_status(canvas: &mut Canvas, status: &str, legend: &str) {
    let (w, h) = (canvas.width(), canvas.height());
    if h <= STATUS_H { return; }
    let y = h - STATUS_H;
    canvas.blend_rect(0, y, w, STATUS_H, STATUS_BG);
    canvas.text(status, 10, y + 6, 2, STATUS_TEXT);
    canvas.text(legend, 10, y + 22, 1, LEGEND_TEXT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_follows_hand_source() {
        assert!(legend(true).contains("SPACE=PINCH"));
        assert!(!legend(false).contains("MOUSE"));
        assert!(!legend(false).contains("SPACE"));
        assert!(legend(false).contains("Q/ESC=QUIT"));
    }

    #[test]
    fn status_bar_only_touches_bottom_strip() {
        let mut sim = Canvas::new(400, 100, 0xFF111111);
        let mut leap = sim.clone();
        draw_status(&mut sim, "VOXELS: 1", legend(true));
        draw_status(&mut leap, "VOXELS: 1", legend(false));
        assert_ne!(sim.pixels(), leap.pixels());
        for y in 0..100 - STATUS_H {
            assert_eq!(sim.pixel(10, y), Some(0xFF111111));
        }
    }
}
