//! Travel limits in the step domain.

/// Travel limits converted to steps (for runtime use).
///
/// The lower bound is the homing zero. Out-of-range targets are always
/// clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelLimits {
    /// Minimum position in steps.
    pub min_steps: i64,
    /// Maximum position in steps.
    pub max_steps: i64,
}

impl TravelLimits {
    /// Create limits spanning `0..=max_steps`.
    pub fn new(max_steps: i64) -> Self {
        Self {
            min_steps: 0,
            max_steps: max_steps.max(0),
        }
    }

    /// Check if a position is within limits.
    pub fn contains(&self, steps: i64) -> bool {
        steps >= self.min_steps && steps <= self.max_steps
    }

    /// Clamp a target into the travel range.
    pub fn clamp(&self, target: i64) -> i64 {
        target.clamp(self.min_steps, self.max_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let limits = TravelLimits::new(9_700);

        assert_eq!(limits.clamp(-500), 0);
        assert_eq!(limits.clamp(0), 0);
        assert_eq!(limits.clamp(4_200), 4_200);
        assert_eq!(limits.clamp(9_700), 9_700);
        assert_eq!(limits.clamp(i64::MAX), 9_700);
    }

    #[test]
    fn test_contains() {
        let limits = TravelLimits::new(100);

        assert!(limits.contains(0));
        assert!(limits.contains(100));
        assert!(!limits.contains(-1));
        assert!(!limits.contains(101));
    }
}
