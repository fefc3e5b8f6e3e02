//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{HomingConfig, MotorConfig, RailConfig};

/// Validate a rail configuration.
///
/// Checks:
/// - Drive train values are positive
/// - Speeds and accelerations are positive
/// - The retract fits inside the travel
/// - Timing values that act as windows or ceilings are non-zero
/// - Default shooting settings are valid
pub fn validate_config(config: &RailConfig) -> Result<()> {
    validate_motor(&config.motor)?;
    validate_homing(&config.homing, &config.motor)?;

    if config.endstop.debounce.0 == 0 {
        return Err(Error::Config(ConfigError::InvalidTiming("endstop.debounce_ms")));
    }

    if config.control.service_interval.0 == 0 {
        return Err(Error::Config(ConfigError::InvalidTiming("control.service_interval_ms")));
    }

    config.shooting.validate()?;

    Ok(())
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn validate_motor(config: &MotorConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            config.steps_per_revolution,
        )));
    }

    if !is_positive(config.gear_ratio) {
        return Err(Error::Config(ConfigError::InvalidGearRatio(config.gear_ratio)));
    }

    if !is_positive(config.screw_lead.0) {
        return Err(Error::Config(ConfigError::InvalidScrewLead(config.screw_lead.0)));
    }

    if !is_positive(config.max_travel.0) {
        return Err(Error::Config(ConfigError::InvalidMaxTravel(config.max_travel.0)));
    }

    if !is_positive(config.max_speed.0) {
        return Err(Error::Config(ConfigError::InvalidSpeed(config.max_speed.0)));
    }

    if !is_positive(config.acceleration.0) {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration.0,
        )));
    }

    Ok(())
}

fn validate_homing(config: &HomingConfig, motor: &MotorConfig) -> Result<()> {
    if !is_positive(config.speed.0) {
        return Err(Error::Config(ConfigError::InvalidSpeed(config.speed.0)));
    }

    if !is_positive(config.acceleration.0) {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration.0,
        )));
    }

    if !is_positive(config.retract.0) || config.retract.0 >= motor.max_travel.0 {
        return Err(Error::Config(ConfigError::InvalidRetract(config.retract.0)));
    }

    if config.retract_timeout.0 == 0 {
        return Err(Error::Config(ConfigError::InvalidTiming("homing.retract_timeout_ms")));
    }

    Ok(())
}
