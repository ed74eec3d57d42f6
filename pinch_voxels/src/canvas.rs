//! Software ARGB framebuffer.
//!
//! Both the scene and the hand overlay are drawn into `Canvas`es; the overlay
//! starts fully transparent and is composited on top of the scene each frame.

use glam::Vec2;
use pinch_pipeline::OverlaySurface;

pub const TRANSPARENT: u32 = 0x00000000;

#[derive(Clone, Debug)]
pub struct Canvas {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Canvas { width, height, pixels: vec![fill; width * height] }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn pixels(&self) -> &[u32] { &self.pixels }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Resize, discarding contents.
    pub fn resize(&mut self, width: usize, height: usize, fill: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, fill);
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.pixels[row * self.width + col] = color;
            }
        }
    }

    /// Like `fill_rect`, but honours the alpha channel of `color`.
    pub fn blend_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let a = (color >> 24) as f32 / 255.0;
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                let dst = &mut self.pixels[row * self.width + col];
                *dst = blend(*dst, color | 0xFF000000, a);
            }
        }
    }

    /// Line of the given stroke width, drawn as a run of discs.
    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: u32) {
        let radius = (width * 0.5).max(0.5);
        let lo = Vec2::splat(-radius - 1.0);
        let hi = Vec2::new(self.width as f32, self.height as f32) + radius + 1.0;
        let Some((from, to)) = clip_segment(from, to, lo, hi) else { return };
        let steps = from.distance(to).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = from.lerp(to, i as f32 / steps as f32);
            if radius <= 0.5 {
                self.set_pixel(p.x.round() as isize, p.y.round() as isize, color);
            } else {
                self.disc(p, radius, color);
            }
        }
    }

    pub fn disc(&mut self, center: Vec2, radius: f32, color: u32) {
        let r2 = radius * radius;
        let x0 = (center.x - radius).floor() as isize;
        let x1 = (center.x + radius).ceil() as isize;
        let y0 = (center.y - radius).floor() as isize;
        let y1 = (center.y + radius).ceil() as isize;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Fill a convex polygon of either winding.
    pub fn fill_convex_polygon(&mut self, pts: &[Vec2], color: u32) {
        if pts.len() < 3 { return; }
        let (mut min, mut max) = (pts[0], pts[0]);
        for p in &pts[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if inside_convex(pts, p) {
                    self.pixels[y * self.width + x] = color;
                }
            }
        }
    }

    /// Copy every non-transparent pixel of `top` over this canvas.
    pub fn blend_over(&mut self, top: &Canvas) {
        if top.width != self.width || top.height != self.height { return; }
        for (dst, &src) in self.pixels.iter_mut().zip(top.pixels.iter()) {
            let a = src >> 24;
            if a == 0xFF {
                *dst = src;
            } else if a != 0 {
                *dst = blend(*dst, src | 0xFF000000, a as f32 / 255.0);
            }
        }
    }

    /// Draw `text` with the 3×5 bitmap font, each font pixel `scale` px wide.
    pub fn text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            if cx + 3 * scale > self.width { break; }
            for (row, bits) in glyph(ch).iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale;
        }
    }
}

impl OverlaySurface for Canvas {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.fill(TRANSPARENT);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: u32) {
        self.line(from, to, width, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: u32) {
        self.disc(center, radius, color);
    }
}

/// Liang–Barsky clip of `a → b` to the rectangle `lo..hi`.
fn clip_segment(a: Vec2, b: Vec2, lo: Vec2, hi: Vec2) -> Option<(Vec2, Vec2)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [
        (-d.x, a.x - lo.x),
        ( d.x, hi.x - a.x),
        (-d.y, a.y - lo.y),
        ( d.y, hi.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 { return None; }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 { return None; }
            t0 = t0.max(r);
        } else {
            if r < t0 { return None; }
            t1 = t1.min(r);
        }
    }
    Some((a + d * t0, a + d * t1))
}

fn inside_convex(pts: &[Vec2], p: Vec2) -> bool {
    let mut sign = 0.0f32;
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        let cross = (b - a).perp_dot(p - a);
        if cross != 0.0 {
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
    }
    true
}

/// Linear blend of two opaque ARGB colors. `t` = 0.0 → all `a`, 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |shift: u32| {
        let ca = ((a >> shift) & 0xFF) as f32;
        let cb = ((b >> shift) & 0xFF) as f32;
        ((ca * (1.0 - t) + cb * t).round() as u32) << shift
    };
    0xFF000000 | mix(16) | mix(8) | mix(0)
}

/// Multiply the RGB channels of an opaque color by `k` (0.0–1.0).
pub fn shade(color: u32, k: f32) -> u32 {
    blend(0xFF000000, color | 0xFF000000, k)
}

fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_clear_is_transparent() {
        let mut c = Canvas::new(8, 8, 0xFFFFFFFF);
        OverlaySurface::clear(&mut c);
        assert!(c.pixels().iter().all(|&p| p == TRANSPARENT));
    }

    #[test]
    fn blend_over_skips_transparent() {
        let mut base = Canvas::new(4, 1, 0xFF111111);
        let mut top = Canvas::new(4, 1, TRANSPARENT);
        top.set_pixel(2, 0, 0xFFFF0000);
        base.blend_over(&top);
        assert_eq!(base.pixels(), &[0xFF111111, 0xFF111111, 0xFFFF0000, 0xFF111111]);
    }

    #[test]
    fn blend_rect_mixes_with_background() {
        let mut c = Canvas::new(2, 1, 0xFF000000);
        c.blend_rect(0, 0, 1, 1, 0x80FFFFFF);
        assert_eq!(c.pixel(0, 0), Some(0xFF808080));
        assert_eq!(c.pixel(1, 0), Some(0xFF000000));
    }

    #[test]
    fn disc_covers_centre_not_corners() {
        let mut c = Canvas::new(20, 20, 0);
        c.disc(Vec2::new(10.0, 10.0), 6.0, 0xFFFF0000);
        assert_eq!(c.pixel(10, 10), Some(0xFFFF0000));
        assert_eq!(c.pixel(0, 0), Some(0));
        assert_eq!(c.pixel(19, 19), Some(0));
    }

    #[test]
    fn line_reaches_both_ends() {
        let mut c = Canvas::new(50, 10, 0);
        c.line(Vec2::new(2.0, 5.0), Vec2::new(47.0, 5.0), 3.0, 0xFF00FF00);
        assert_eq!(c.pixel(2, 5), Some(0xFF00FF00));
        assert_eq!(c.pixel(46, 5), Some(0xFF00FF00));
        assert_eq!(c.pixel(25, 0), Some(0));
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut c = Canvas::new(10, 10, 0);
        c.disc(Vec2::new(-50.0, -50.0), 6.0, 0xFFFFFFFF);
        c.line(Vec2::new(-20.0, 5.0), Vec2::new(30.0, 5.0), 1.0, 0xFFFFFFFF);
        c.fill_convex_polygon(&[Vec2::new(-5.0, -5.0), Vec2::new(50.0, -5.0), Vec2::new(50.0, 50.0)], 0xFF0000FF);
        assert_eq!(c.pixels().len(), 100);
    }

    #[test]
    fn far_off_lines_are_clipped_to_view() {
        assert!(clip_segment(Vec2::new(-10.0, -10.0), Vec2::new(-5.0, 50.0), Vec2::ZERO, Vec2::splat(20.0)).is_none());
        let (a, b) = clip_segment(Vec2::new(-1.0e6, 5.0), Vec2::new(1.0e6, 5.0), Vec2::ZERO, Vec2::splat(20.0)).unwrap();
        assert!(a.x.abs() < 0.5 && (b.x - 20.0).abs() < 0.5);

        let mut c = Canvas::new(20, 20, 0);
        c.line(Vec2::new(-1.0e6, 10.0), Vec2::new(1.0e6, 10.0), 1.0, 0xFFFFFFFF);
        assert_eq!(c.pixel(10, 10), Some(0xFFFFFFFF));
    }

    #[test]
    fn polygon_fill_either_winding() {
        let quad_cw  = [Vec2::new(2.0, 2.0), Vec2::new(8.0, 2.0), Vec2::new(8.0, 8.0), Vec2::new(2.0, 8.0)];
        let mut quad_ccw = quad_cw;
        quad_ccw.reverse();
        for quad in [quad_cw, quad_ccw] {
            let mut c = Canvas::new(10, 10, 0);
            c.fill_convex_polygon(&quad, 0xFFABCDEF);
            assert_eq!(c.pixel(5, 5), Some(0xFFABCDEF));
            assert_eq!(c.pixel(0, 0), Some(0));
            assert_eq!(c.pixel(9, 9), Some(0));
        }
    }

    #[test]
    fn resize_changes_overlay_size() {
        let mut c = Canvas::new(4, 4, 0);
        c.resize(16, 9, TRANSPARENT);
        assert_eq!(OverlaySurface::size(&c), (16, 9));
        assert_eq!(c.pixels().len(), 144);
    }

    #[test]
    fn shade_scales_channels() {
        assert_eq!(shade(0xFF00FF00, 1.0), 0xFF00FF00);
        assert_eq!(shade(0xFF00FF00, 0.0), 0xFF000000);
        assert_eq!(shade(0xFF00FF00, 0.5), 0xFF008000);
    }

    #[test]
    fn text_draws_pixels() {
        let mut c = Canvas::new(40, 10, 0);
        c.text("H1", 0, 0, 1, 0xFFFFFFFF);
        assert_eq!(c.pixel(0, 0), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(3, 0), Some(0));
    }
}
