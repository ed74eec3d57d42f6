//! Hand landmark model.
//!
//! A detected hand is 21 normalized 2D joint positions in a fixed anatomical
//! order.  Coordinates are fractions of the captured frame's width/height,
//! so `(0, 0)` is the top-left corner and `y` grows downward.

use glam::Vec2;

/// Number of landmarks in one detected hand.
pub const LANDMARK_COUNT: usize = 21;

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single normalized joint position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y }
    }

    /// Euclidean distance in normalized coordinate space.
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Scale into pixel space of a `width` × `height` surface.
    pub fn denormalize(&self, width: usize, height: usize) -> Vec2 {
        Vec2::new(self.x * width as f32, self.y * height as f32)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Joint numbering
// ════════════════════════════════════════════════════════════════════════════

/// The 21 hand joints, numbered the way hand-landmark models report them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Joint {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl Joint {
    pub const ALL: [Joint; LANDMARK_COUNT] = [
        Joint::Wrist,
        Joint::ThumbCmc, Joint::ThumbMcp, Joint::ThumbIp, Joint::ThumbTip,
        Joint::IndexMcp, Joint::IndexPip, Joint::IndexDip, Joint::IndexTip,
        Joint::MiddleMcp, Joint::MiddlePip, Joint::MiddleDip, Joint::MiddleTip,
        Joint::RingMcp, Joint::RingPip, Joint::RingDip, Joint::RingTip,
        Joint::PinkyMcp, Joint::PinkyPip, Joint::PinkyDip, Joint::PinkyTip,
    ];

    /// Position of this joint in a [`HandFrame`] (0–20).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Joint::Wrist     => "wrist",
            Joint::ThumbCmc  => "thumb-cmc",
            Joint::ThumbMcp  => "thumb-mcp",
            Joint::ThumbIp   => "thumb-ip",
            Joint::ThumbTip  => "thumb-tip",
            Joint::IndexMcp  => "index-mcp",
            Joint::IndexPip  => "index-pip",
            Joint::IndexDip  => "index-dip",
            Joint::IndexTip  => "index-tip",
            Joint::MiddleMcp => "middle-mcp",
            Joint::MiddlePip => "middle-pip",
            Joint::MiddleDip => "middle-dip",
            Joint::MiddleTip => "middle-tip",
            Joint::RingMcp   => "ring-mcp",
            Joint::RingPip   => "ring-pip",
            Joint::RingDip   => "ring-dip",
            Joint::RingTip   => "ring-tip",
            Joint::PinkyMcp  => "pinky-mcp",
            Joint::PinkyPip  => "pinky-pip",
            Joint::PinkyDip  => "pinky-dip",
            Joint::PinkyTip  => "pinky-tip",
        }
    }
}

/// Skeleton segments drawn by the overlay: five wrist-to-fingertip chains.
pub const HAND_CONNECTIONS: [(usize, usize); 20] = [
    (0, 1),  (1, 2),   (2, 3),   (3, 4),
    (0, 5),  (5, 6),   (6, 7),   (7, 8),
    (0, 9),  (9, 10),  (10, 11), (11, 12),
    (0, 13), (13, 14), (14, 15), (15, 16),
    (0, 17), (17, 18), (18, 19), (19, 20),
];

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand: exactly [`LANDMARK_COUNT`] landmarks.
///
/// Produced once per captured frame and consumed immediately; absence of a
/// hand is expressed as `Option<HandFrame>` rather than an empty frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandFrame { points }
    }

    /// Build from a detector's landmark list; `None` unless it has exactly 21 entries.
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(HandFrame { points })
    }

    pub fn landmark(&self, joint: Joint) -> Landmark {
        self.points[joint.index()]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_numbering_matches_model() {
        assert_eq!(Joint::Wrist.index(), 0);
        assert_eq!(Joint::ThumbTip.index(), 4);
        assert_eq!(Joint::IndexTip.index(), 8);
        assert_eq!(Joint::PinkyTip.index(), 20);
        for (i, j) in Joint::ALL.iter().enumerate() {
            assert_eq!(j.index(), i, "{} out of order", j.as_str());
        }
    }

    #[test]
    fn connections_cover_every_joint() {
        let mut seen = [false; LANDMARK_COUNT];
        for &(a, b) in HAND_CONNECTIONS.iter() {
            seen[a] = true;
            seen[b] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn from_slice_requires_exactly_21() {
        let pts = vec![Landmark::default(); 20];
        assert!(HandFrame::from_slice(&pts).is_none());
        let pts = vec![Landmark::default(); 22];
        assert!(HandFrame::from_slice(&pts).is_none());
        let pts = vec![Landmark::new(0.25, 0.75); 21];
        let hand = HandFrame::from_slice(&pts).unwrap();
        assert_eq!(hand.landmark(Joint::IndexTip), Landmark::new(0.25, 0.75));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(0.3, 0.4);
        assert!((a.distance(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn denormalize_scales_by_surface() {
        let p = Landmark::new(0.5, 0.25).denormalize(800, 400);
        assert_eq!(p, Vec2::new(400.0, 100.0));
    }
}
