//! Time-based debouncing of the endstop level.

use core::time::Duration;

use crate::time::Instant;

/// Debounces a boolean level.
///
/// A new level is accepted only after it has been observed continuously for
/// at least the configured window. Bouncing back to the stable level before
/// that discards the candidate.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    stable: bool,
    last_raw: bool,
    candidate_since: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer whose stable level starts at `initial`.
    pub fn new(window: Duration, initial: bool) -> Self {
        Self {
            window,
            stable: initial,
            last_raw: initial,
            candidate_since: None,
        }
    }

    /// Feed one raw sample taken at `now` and return the debounced level.
    pub fn sample(&mut self, raw: bool, now: Instant) -> bool {
        self.last_raw = raw;

        if raw == self.stable {
            self.candidate_since = None;
            return self.stable;
        }

        let since = *self.candidate_since.get_or_insert(now);
        if now.has_elapsed(since, self.window) {
            self.stable = raw;
            self.candidate_since = None;
        }
        self.stable
    }

    /// Current debounced level.
    #[inline]
    pub fn level(&self) -> bool {
        self.stable
    }

    /// Most recent raw sample.
    #[inline]
    pub fn raw(&self) -> bool {
        self.last_raw
    }

    /// Debounce window.
    #[inline]
    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WINDOW: Duration = Duration::from_millis(50);

    #[test]
    fn test_accepts_level_after_window() {
        let mut d = Debouncer::new(WINDOW, false);

        assert!(!d.sample(true, Instant::from_millis(0)));
        assert!(!d.sample(true, Instant::from_millis(49)));
        assert!(d.sample(true, Instant::from_millis(50)));
        assert!(d.level());
    }

    #[test]
    fn test_bounce_restarts_window() {
        let mut d = Debouncer::new(WINDOW, false);

        d.sample(true, Instant::from_millis(0));
        d.sample(false, Instant::from_millis(30));
        assert!(!d.sample(true, Instant::from_millis(60)));
        assert!(!d.sample(true, Instant::from_millis(100)));
        assert!(d.sample(true, Instant::from_millis(110)));
        assert!(d.raw());
    }

    proptest! {
        #[test]
        fn prop_short_glitches_never_pass(
            glitches in proptest::collection::vec(1u64..49, 1..20)
        ) {
            let mut d = Debouncer::new(WINDOW, false);
            let mut t = 0u64;
            for len in glitches {
                prop_assert!(!d.sample(true, Instant::from_millis(t)));
                t += len;
                prop_assert!(!d.sample(true, Instant::from_millis(t)));
                prop_assert!(!d.sample(false, Instant::from_millis(t + 1)));
                t += 2;
            }
        }

        #[test]
        fn prop_steady_level_always_passes(level: bool, hold in 50u64..10_000) {
            let mut d = Debouncer::new(WINDOW, !level);
            d.sample(level, Instant::from_millis(1_000));
            prop_assert_eq!(d.sample(level, Instant::from_millis(1_000 + hold)), level);
        }
    }
}
