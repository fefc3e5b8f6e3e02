//! Pin-free motor for host tests and demos.

use crate::config::units::Steps;
use crate::config::RailMechanics;
use crate::error::Result;
use crate::motion::SpeedRamp;
use crate::time::Instant;

use super::MotionDriver;

/// A [`MotionDriver`] that runs the real step scheduler without touching GPIO.
///
/// Counts emitted steps and enable transitions so tests can assert on motor
/// power handling.
#[derive(Debug, Clone)]
pub struct SimulatedMotor {
    ramp: SpeedRamp,
    enabled: bool,
    steps_emitted: u64,
    enable_count: u32,
    disable_count: u32,
}

impl SimulatedMotor {
    /// Create a disabled motor at position 0.
    pub fn new(max_speed: f32, acceleration: f32) -> Self {
        Self {
            ramp: SpeedRamp::new(max_speed, acceleration),
            enabled: false,
            steps_emitted: 0,
            enable_count: 0,
            disable_count: 0,
        }
    }

    /// Create from derived rail mechanics.
    pub fn from_mechanics(mechanics: &RailMechanics) -> Self {
        Self::new(
            mechanics.max_speed_steps_per_sec,
            mechanics.acceleration_steps_per_sec2,
        )
    }

    /// Total steps emitted since construction.
    pub fn steps_emitted(&self) -> u64 {
        self.steps_emitted
    }

    /// Number of disabled-to-enabled transitions.
    pub fn enable_count(&self) -> u32 {
        self.enable_count
    }

    /// Number of enabled-to-disabled transitions.
    pub fn disable_count(&self) -> u32 {
        self.disable_count
    }

    /// Current speed ceiling in steps per second.
    pub fn max_speed(&self) -> f32 {
        self.ramp.max_speed()
    }
}

impl MotionDriver for SimulatedMotor {
    fn move_to(&mut self, target: Steps) {
        self.ramp.move_to(target.0);
    }

    fn set_current_position(&mut self, position: Steps) {
        self.ramp.set_current_position(position.0);
    }

    fn current_position(&self) -> Steps {
        Steps(self.ramp.current_position())
    }

    fn target_position(&self) -> Steps {
        Steps(self.ramp.target_position())
    }

    fn speed(&self) -> f32 {
        self.ramp.speed()
    }

    fn set_max_speed(&mut self, steps_per_sec: f32) {
        self.ramp.set_max_speed(steps_per_sec);
    }

    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        self.ramp.set_acceleration(steps_per_sec2);
    }

    fn halt(&mut self) {
        self.ramp.halt();
    }

    fn step(&mut self, now: Instant) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        let stepped = self.ramp.run(now).is_some();
        if stepped {
            self.steps_emitted += 1;
        }
        Ok(stepped)
    }

    fn enable(&mut self) -> Result<()> {
        if !self.enabled {
            self.enable_count += 1;
        }
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        if self.enabled {
            self.disable_count += 1;
        }
        self.enabled = false;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_motor_reaches_target() {
        let mut motor = SimulatedMotor::new(1_000.0, 5_000.0);
        motor.enable().unwrap();
        motor.move_to(Steps(50));

        let mut t = 0u64;
        while motor.remaining() != 0 && t < 1_000_000 {
            motor.step(Instant::from_micros(t)).unwrap();
            t += 100;
        }

        assert_eq!(motor.current_position(), Steps(50));
        assert_eq!(motor.steps_emitted(), 50);
    }

    #[test]
    fn test_simulated_motor_counts_transitions() {
        let mut motor = SimulatedMotor::new(1_000.0, 5_000.0);
        motor.disable().unwrap();
        assert_eq!(motor.disable_count(), 0);

        motor.enable().unwrap();
        motor.enable().unwrap();
        motor.disable().unwrap();
        assert_eq!(motor.enable_count(), 1);
        assert_eq!(motor.disable_count(), 1);
    }
}
