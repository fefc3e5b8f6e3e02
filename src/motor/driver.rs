//! Stepper motor driver.
//!
//! Generic over embedded-hal 1.0 pin types: STEP/DIR/ENABLE outputs and a
//! delay provider for the STEP pulse width.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Millimeters, Steps};
use crate::config::RailMechanics;
use crate::error::{MotorError, Result};
use crate::motion::{Direction, MotionPhase, SpeedRamp};
use crate::time::Instant;

use super::position::Position;
use super::MotionDriver;

/// STEP pulse width in microseconds.
const PULSE_WIDTH_US: u32 = 2;

/// Stepper motor driver.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `EN`: ENABLE pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider (must implement `DelayNs`)
pub struct StepperMotor<STEP, DIR, EN, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    DELAY: DelayNs,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = forward, low = reverse, or inverted).
    dir_pin: DIR,

    /// ENABLE pin of the driver.
    enable_pin: EN,

    /// Delay provider for the STEP pulse width.
    delay: DELAY,

    /// Step scheduler and open-loop position counter.
    ramp: SpeedRamp,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// Mechanical constraints from configuration.
    mechanics: RailMechanics,

    /// Motor name for logging/debugging.
    name: heapless::String<32>,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Whether ENABLE is active low.
    enable_active_low: bool,

    /// Whether current is delivered.
    enabled: bool,
}

impl<STEP, DIR, EN, DELAY> StepperMotor<STEP, DIR, EN, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new, disabled motor at position 0 and put the pins in a known state.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        enable_pin: EN,
        delay: DELAY,
        mechanics: RailMechanics,
        name: heapless::String<32>,
        invert_direction: bool,
        enable_active_low: bool,
    ) -> Result<Self> {
        let ramp = SpeedRamp::new(
            mechanics.max_speed_steps_per_sec,
            mechanics.acceleration_steps_per_sec2,
        );
        let mut motor = Self {
            step_pin,
            dir_pin,
            enable_pin,
            delay,
            ramp,
            current_direction: None,
            mechanics,
            name,
            invert_direction,
            enable_active_low,
            enabled: true,
        };
        motor.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        motor.disable()?;
        Ok(motor)
    }

    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get current position with unit conversions.
    #[inline]
    pub fn position(&self) -> Position {
        Position::at(self.current_position(), self.mechanics.steps_per_mm)
    }

    /// Get current position in millimeters.
    #[inline]
    pub fn position_mm(&self) -> Millimeters {
        self.position().mm()
    }

    /// Get the mechanical constraints.
    #[inline]
    pub fn mechanics(&self) -> &RailMechanics {
        &self.mechanics
    }

    /// Get current motion phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.ramp.phase()
    }

    /// Release the pins.
    pub fn release(self) -> (STEP, DIR, EN, DELAY) {
        (self.step_pin, self.dir_pin, self.enable_pin, self.delay)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Forward => !self.invert_direction,
            Direction::Reverse => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }

    fn write_enable(&mut self, on: bool) -> Result<()> {
        let pin_high = on != self.enable_active_low;
        if pin_high {
            self.enable_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.enable_pin.set_low().map_err(|_| MotorError::PinError)?;
        }
        self.enabled = on;
        Ok(())
    }
}

impl<STEP, DIR, EN, DELAY> MotionDriver for StepperMotor<STEP, DIR, EN, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    DELAY: DelayNs,
{
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

        let Some(direction) = self.ramp.due(now) else {
            return Ok(false);
        };

        self.set_direction(direction)?;

        // Generate step pulse
        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(PULSE_WIDTH_US);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;

        // Count the step only once it reached the driver
        self.ramp.run(now);
        Ok(true)
    }

    fn enable(&mut self) -> Result<()> {
        self.write_enable(true)
    }

    fn disable(&mut self) -> Result<()> {
        self.write_enable(false)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
