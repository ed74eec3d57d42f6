//! Normalized landmark → world-space placement point.

use glam::Vec3;

use crate::landmark::Landmark;

/// World units covered by the full normalized range on each axis.
pub const DEFAULT_SPAN: f32 = 10.0;

/// Fixed linear mapping onto the `z = 0` plane.
///
/// Image `y` grows downward while world `y` grows upward, hence the flip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    pub span: f32,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        CoordinateMapper { span: DEFAULT_SPAN }
    }
}

impl CoordinateMapper {
    pub fn new(span: f32) -> Self {
        CoordinateMapper { span }
    }

    pub fn map(&self, landmark: &Landmark) -> Vec3 {
        Vec3::new(
            (landmark.x - 0.5) * self.span,
            (0.5 - landmark.y) * self.span,
            0.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_maps_to_origin() {
        let m = CoordinateMapper::default();
        assert_eq!(m.map(&Landmark::new(0.5, 0.5)), Vec3::ZERO);
    }

    #[test]
    fn top_left_maps_up_and_left() {
        let m = CoordinateMapper::default();
        assert_eq!(m.map(&Landmark::new(0.0, 0.0)), Vec3::new(-5.0, 5.0, 0.0));
    }

    #[test]
    fn bottom_right_maps_down_and_right() {
        let m = CoordinateMapper::default();
        assert_eq!(m.map(&Landmark::new(1.0, 1.0)), Vec3::new(5.0, -5.0, 0.0));
    }

    #[test]
    fn span_scales_linearly() {
        let m = CoordinateMapper::new(4.0);
        assert_eq!(m.map(&Landmark::new(0.75, 0.25)), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn depth_is_always_zero() {
        let m = CoordinateMapper::default();
        for &(x, y) in &[(0.1, 0.9), (0.7, 0.3), (0.33, 0.66)] {
            assert_eq!(m.map(&Landmark::new(x, y)).z, 0.0);
        }
    }
}
