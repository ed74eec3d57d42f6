//! Pinch classification.
//!
//! A hand is pinching when its thumb tip and index fingertip are closer than
//! a fixed threshold in normalized coordinate space.  The threshold depends on
//! the landmark model's coordinate scale, so it is a parameter, not a constant
//! baked into the check.

use crate::landmark::{HandFrame, Joint};

/// Default thumb-tip ↔ index-tip distance below which a hand is pinching.
pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchClassifier {
    pub threshold: f32,
}

impl Default for PinchClassifier {
    fn default() -> Self {
        PinchClassifier { threshold: DEFAULT_PINCH_THRESHOLD }
    }
}

impl PinchClassifier {
    pub fn new(threshold: f32) -> Self {
        PinchClassifier { threshold }
    }

    /// Distance between landmark 4 (thumb tip) and landmark 8 (index tip).
    pub fn pinch_distance(&self, hand: &HandFrame) -> f32 {
        hand.landmark(Joint::ThumbTip).distance(&hand.landmark(Joint::IndexTip))
    }

    /// `true` iff the tips are strictly closer than the threshold.
    pub fn is_pinching(&self, hand: &HandFrame) -> bool {
        self.pinch_distance(hand) < self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, LANDMARK_COUNT};

    fn hand_with_tips(thumb: Landmark, index: Landmark) -> HandFrame {
        let mut pts = [Landmark::new(0.5, 0.9); LANDMARK_COUNT];
        pts[Joint::ThumbTip.index()] = thumb;
        pts[Joint::IndexTip.index()] = index;
        HandFrame::new(pts)
    }

    #[test]
    fn close_tips_pinch() {
        let c = PinchClassifier::default();
        let hand = hand_with_tips(Landmark::new(0.50, 0.50), Landmark::new(0.52, 0.50));
        assert!(c.is_pinching(&hand));
    }

    #[test]
    fn far_tips_do_not_pinch() {
        let c = PinchClassifier::default();
        let hand = hand_with_tips(Landmark::new(0.40, 0.50), Landmark::new(0.50, 0.60));
        assert!(!c.is_pinching(&hand));
    }

    #[test]
    fn threshold_is_exclusive() {
        // Threshold chosen so the distance is exactly representable.
        let c = PinchClassifier::new(0.25);
        let hand = hand_with_tips(Landmark::new(0.0, 0.0), Landmark::new(0.25, 0.0));
        assert_eq!(c.pinch_distance(&hand), 0.25);
        assert!(!c.is_pinching(&hand));
    }

    #[test]
    fn exactly_default_threshold_is_not_a_pinch() {
        let c = PinchClassifier::default();
        let hand = hand_with_tips(Landmark::new(0.0, 0.0), Landmark::new(0.05, 0.0));
        assert_eq!(c.pinch_distance(&hand), DEFAULT_PINCH_THRESHOLD);
        assert!(!c.is_pinching(&hand));
    }

    #[test]
    fn default_threshold_boundary() {
        let c = PinchClassifier::default();
        let inside  = hand_with_tips(Landmark::new(0.0, 0.0), Landmark::new(0.0, 0.0499));
        let outside = hand_with_tips(Landmark::new(0.0, 0.0), Landmark::new(0.0, 0.0501));
        assert!(c.is_pinching(&inside));
        assert!(!c.is_pinching(&outside));
    }

    #[test]
    fn threshold_is_overridable() {
        let hand = hand_with_tips(Landmark::new(0.5, 0.5), Landmark::new(0.58, 0.5));
        assert!(!PinchClassifier::default().is_pinching(&hand));
        assert!(PinchClassifier::new(0.1).is_pinching(&hand));
    }

    #[test]
    fn only_thumb_and_index_matter() {
        let c = PinchClassifier::default();
        let mut pts = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        pts[Joint::ThumbTip.index()] = Landmark::new(0.1, 0.1);
        pts[Joint::IndexTip.index()] = Landmark::new(0.9, 0.9);
        assert!(!c.is_pinching(&HandFrame::new(pts)));
    }
}
