//! Debounce gate — turns a continuous pinch signal into discrete placements.
//!
//! A pinch is held across many consecutive frames, so the gate only lets one
//! placement through per cooldown window.

use std::time::{Duration, Instant};

/// Default minimum interval between two accepted placements.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
pub struct DebounceGate {
    cooldown: Duration,
    /// `None` until the first accepted placement, so the first pinch of a
    /// session is never suppressed.
    last_accepted: Option<Instant>,
}

impl Default for DebounceGate {
    fn default() -> Self {
        DebounceGate::new(DEFAULT_COOLDOWN)
    }
}

impl DebounceGate {
    pub fn new(cooldown: Duration) -> Self {
        DebounceGate { cooldown, last_accepted: None }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }

    /// Emit a placement event iff `pinching` and strictly more than the
    /// cooldown has elapsed since the last accepted one.
    ///
    /// A `now` earlier than the last acceptance counts as zero elapsed time.
    pub fn accept(&mut self, pinching: bool, now: Instant) -> bool {
        if !pinching {
            return false;
        }
        let open = match self.last_accepted {
            None       => true,
            Some(last) => now.saturating_duration_since(last) > self.cooldown,
        };
        if open {
            self.last_accepted = Some(now);
        }
        open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    #[test]
    fn first_pinch_is_accepted() {
        let mut gate = DebounceGate::default();
        assert!(gate.accept(true, Instant::now()));
    }

    #[test]
    fn no_pinch_never_emits() {
        let mut gate = DebounceGate::default();
        let t0 = Instant::now();
        for i in 0..100 {
            assert!(!gate.accept(false, t0 + ms(i * 16)));
        }
        assert!(gate.last_accepted().is_none());
    }

    #[test]
    fn held_pinch_fires_once_per_window() {
        // 16 ms samples for one second against a 500 ms cooldown:
        // accepted at t=0 and t=512, nothing else.
        let mut gate = DebounceGate::new(ms(500));
        let t0 = Instant::now();
        let mut fired = Vec::new();
        let mut t = 0;
        while t <= 1000 {
            if gate.accept(true, t0 + ms(t)) {
                fired.push(t);
            }
            t += 16;
        }
        assert_eq!(fired, vec![0, 512]);
    }

    #[test]
    fn cooldown_boundary_is_exclusive() {
        let mut gate = DebounceGate::new(ms(500));
        let t0 = Instant::now();
        assert!(gate.accept(true, t0));
        assert!(!gate.accept(true, t0 + ms(500)));
        assert!(gate.accept(true, t0 + ms(501)));
    }

    #[test]
    fn suppressed_pinch_does_not_reset_window() {
        let mut gate = DebounceGate::new(ms(500));
        let t0 = Instant::now();
        assert!(gate.accept(true, t0));
        assert!(!gate.accept(true, t0 + ms(400)));
        assert_eq!(gate.last_accepted(), Some(t0));
        assert!(gate.accept(true, t0 + ms(550)));
    }

    #[test]
    fn time_going_backwards_is_suppressed() {
        let mut gate = DebounceGate::new(ms(500));
        let t0 = Instant::now() + ms(1000);
        assert!(gate.accept(true, t0));
        assert!(!gate.accept(true, t0 - ms(900)));
    }

    #[test]
    fn zero_cooldown_needs_advancing_time() {
        let mut gate = DebounceGate::new(Duration::ZERO);
        let t0 = Instant::now();
        assert!(gate.accept(true, t0));
        assert!(!gate.accept(true, t0));
        assert!(gate.accept(true, t0 + ms(1)));
    }
}
