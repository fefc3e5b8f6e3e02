//! Mechanical constraints derived from the motor configuration.

use super::limits::TravelLimits;
use super::motor::MotorConfig;
use super::units::{Millimeters, MillimetersPerSec, MillimetersPerSecSquared, Steps};

/// Derived mechanical parameters computed from motor configuration.
///
/// These are computed once at initialization and used for all motion planning.
#[derive(Debug, Clone)]
pub struct RailMechanics {
    /// Microsteps per millimeter of carriage travel.
    pub steps_per_mm: f32,

    /// Travel limits in steps.
    pub limits: TravelLimits,

    /// Speed ceiling in steps per second.
    pub max_speed_steps_per_sec: f32,

    /// Positioning acceleration in steps per second squared.
    pub acceleration_steps_per_sec2: f32,

    /// Minimum step interval in microseconds (at the speed ceiling).
    pub min_step_interval_us: u32,
}

impl RailMechanics {
    /// Compute mechanical constraints from motor configuration.
    pub fn from_config(config: &MotorConfig) -> Self {
        let steps_per_mm = config.steps_per_mm();
        let max_travel_steps = (config.max_travel.0 * steps_per_mm) as i64;
        let max_speed_steps_per_sec = config.max_speed.0 * steps_per_mm;

        let min_step_interval_us = if max_speed_steps_per_sec > 0.0 {
            (1_000_000.0 / max_speed_steps_per_sec) as u32
        } else {
            u32::MAX
        };

        Self {
            steps_per_mm,
            limits: TravelLimits::new(max_travel_steps),
            max_speed_steps_per_sec,
            acceleration_steps_per_sec2: config.acceleration.0 * steps_per_mm,
            min_step_interval_us,
        }
    }

    /// Full travel in steps.
    #[inline]
    pub fn max_travel_steps(&self) -> i64 {
        self.limits.max_steps
    }

    /// Convert millimeters to steps.
    #[inline]
    pub fn mm_to_steps(&self, mm: Millimeters) -> Steps {
        Steps::from_mm(mm, self.steps_per_mm)
    }

    /// Convert steps to millimeters.
    #[inline]
    pub fn steps_to_mm(&self, steps: Steps) -> Millimeters {
        steps.to_mm(self.steps_per_mm)
    }

    /// Convert a target in millimeters to a clamped step target.
    ///
    /// Clamping happens in the step domain so the far limit is exact.
    pub fn clamp_target(&self, target: Millimeters) -> Steps {
        Steps(self.limits.clamp(self.mm_to_steps(target).0))
    }

    /// Convert mm/s to steps/s, capped at the speed ceiling.
    #[inline]
    pub fn speed_to_steps(&self, speed: MillimetersPerSec) -> f32 {
        let steps = speed.0 * self.steps_per_mm;
        if steps > self.max_speed_steps_per_sec {
            self.max_speed_steps_per_sec
        } else {
            steps
        }
    }

    /// Convert mm/s² to steps/s².
    #[inline]
    pub fn acceleration_to_steps(&self, acceleration: MillimetersPerSecSquared) -> f32 {
        acceleration.0 * self.steps_per_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::Microsteps;

    fn make_test_config() -> MotorConfig {
        MotorConfig {
            steps_per_revolution: 200,
            microsteps: Microsteps::FULL,
            gear_ratio: 1.0,
            screw_lead: Millimeters(2.0),
            max_travel: Millimeters(97.0),
            max_speed: MillimetersPerSec(10.0),
            acceleration: MillimetersPerSecSquared(100.0),
            invert_direction: false,
            enable_active_low: true,
        }
    }

    #[test]
    fn test_travel_in_steps() {
        let mechanics = RailMechanics::from_config(&make_test_config());

        // 97 mm * 100 steps/mm
        assert_eq!(mechanics.max_travel_steps(), 9_700);
    }

    #[test]
    fn test_clamp_target() {
        let mechanics = RailMechanics::from_config(&make_test_config());

        assert_eq!(mechanics.clamp_target(Millimeters(-5.0)), Steps(0));
        assert_eq!(mechanics.clamp_target(Millimeters(12.34)), Steps(1_234));
        assert_eq!(mechanics.clamp_target(Millimeters(500.0)), Steps(9_700));
    }

    #[test]
    fn test_speed_is_capped() {
        let mechanics = RailMechanics::from_config(&make_test_config());

        assert!((mechanics.speed_to_steps(MillimetersPerSec(0.7)) - 70.0).abs() < 0.01);
        assert_eq!(mechanics.speed_to_steps(MillimetersPerSec(50.0)), 1_000.0);
        assert_eq!(mechanics.min_step_interval_us, 1_000);
    }
}
