//! Monotonic time for the tick loop.
//!
//! The rail never reads a clock on its own. The caller passes an [`Instant`]
//! into every tick, which keeps the state machine deterministic and lets tests
//! drive time explicitly.

use core::ops::Add;
use core::time::Duration;

/// A point on a monotonic microsecond timeline (typically time since boot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant(u64);

impl Instant {
    /// The start of the timeline.
    pub const ZERO: Self = Self(0);

    /// Create from microseconds.
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Create from milliseconds.
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000))
    }

    /// Microseconds since the start of the timeline.
    #[inline]
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Milliseconds since the start of the timeline.
    #[inline]
    pub const fn as_millis(self) -> u64 {
        self.0 / 1_000
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    #[inline]
    pub fn saturating_duration_since(self, earlier: Instant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }

    /// Whether at least `window` has passed since `since`.
    #[inline]
    pub fn has_elapsed(self, since: Instant, window: Duration) -> bool {
        self.saturating_duration_since(since) >= window
    }
}

impl Add<Duration> for Instant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        let micros = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(micros))
    }
}

/// Source of monotonic time for a runner loop.
pub trait Clock {
    /// Current time.
    fn now(&self) -> Instant;
}
