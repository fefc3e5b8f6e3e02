//! Builder pattern for StepperMotor.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::{MotorConfig, RailConfig, RailMechanics};
use crate::error::{ConfigError, Error, Result};

use super::driver::StepperMotor;

/// Builder for creating StepperMotor instances.
///
/// Pins and delay are required; everything else falls back to the
/// [`MotorConfig`] defaults.
pub struct StepperMotorBuilder<STEP, DIR, EN, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    DELAY: DelayNs,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    enable_pin: Option<EN>,
    delay: Option<DELAY>,
    name: Option<heapless::String<32>>,
    config: MotorConfig,
}

impl<STEP, DIR, EN, DELAY> Default for StepperMotorBuilder<STEP, DIR, EN, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, EN, DELAY> StepperMotorBuilder<STEP, DIR, EN, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            enable_pin: None,
            delay: None,
            name: None,
            config: MotorConfig::default(),
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the ENABLE pin.
    pub fn enable_pin(mut self, pin: EN) -> Self {
        self.enable_pin = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the motor name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = heapless::String::try_from(name).ok();
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.config.invert_direction = invert;
        self
    }

    /// Set ENABLE polarity.
    pub fn enable_active_low(mut self, active_low: bool) -> Self {
        self.config.enable_active_low = active_low;
        self
    }

    /// Configure from a MotorConfig.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Configure from the `[motor]` table of a RailConfig.
    pub fn from_config(self, config: &RailConfig) -> Self {
        self.from_motor_config(&config.motor)
    }

    /// Build the StepperMotor.
    ///
    /// The STEP line is driven low and the driver is left disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin or the delay is missing, or if the initial
    /// pin writes fail.
    pub fn build(self) -> Result<StepperMotor<STEP, DIR, EN, DELAY>> {
        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingField("step_pin")))?;
        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingField("dir_pin")))?;
        let enable_pin = self
            .enable_pin
            .ok_or(Error::Config(ConfigError::MissingField("enable_pin")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;

        let name = match self.name {
            Some(name) => name,
            None => {
                let mut name = heapless::String::new();
                let _ = name.push_str("rail");
                name
            }
        };

        StepperMotor::new(
            step_pin,
            dir_pin,
            enable_pin,
            delay,
            RailMechanics::from_config(&self.config),
            name,
            self.config.invert_direction,
            self.config.enable_active_low,
        )
    }
}
