//! Position tracking for the carriage.
//!
//! Provides absolute position in steps with millimeter conversions.

use crate::config::units::{Millimeters, Steps};

/// Carriage position.
///
/// The step count is authoritative; millimeters are derived for display.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    /// Current position in steps (from the homing zero)
    steps: Steps,
    /// Steps per millimeter for conversions
    steps_per_mm: f32,
}

impl Position {
    /// Create a position tracker at the origin.
    #[inline]
    pub fn new(steps_per_mm: f32) -> Self {
        Self {
            steps: Steps::default(),
            steps_per_mm,
        }
    }

    /// Create a position tracker at a specific position.
    #[inline]
    pub fn at(steps: Steps, steps_per_mm: f32) -> Self {
        Self { steps, steps_per_mm }
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Get current position in millimeters.
    #[inline]
    pub fn mm(&self) -> Millimeters {
        self.steps.to_mm(self.steps_per_mm)
    }

    /// Get steps per millimeter conversion factor.
    #[inline]
    pub fn steps_per_mm(&self) -> f32 {
        self.steps_per_mm
    }

    /// Position offset by a distance, in steps.
    #[inline]
    pub fn offset_by(&self, delta: Millimeters) -> Steps {
        self.steps + Steps::from_mm(delta, self.steps_per_mm)
    }

    /// Calculate steps needed to reach a target position in millimeters.
    #[inline]
    pub fn steps_to(&self, target: Millimeters) -> i64 {
        let target_steps = Steps::from_mm(target, self.steps_per_mm);
        target_steps.0 - self.steps.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_conversions() {
        // 7266.67 steps/mm on the stock drive train
        let steps_per_mm = 100.0 * 16.0 * (109.0 / 12.0) / 2.0;
        let pos = Position::at(Steps(72_667), steps_per_mm);

        assert!((pos.mm().value() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_offset_and_steps_to() {
        let pos = Position::at(Steps(900), 100.0);

        assert_eq!(pos.offset_by(Millimeters(0.3)), Steps(930));
        assert_eq!(pos.steps_to(Millimeters(18.0)), 900);
    }
}
