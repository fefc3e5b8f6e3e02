//! Unit tests for configuration validation.

use macro_rail::config::units::{Millimeters, MillimetersPerSec, Milliseconds};
use macro_rail::config::{validate_config, RailConfig};
use macro_rail::error::{ConfigError, Error, SettingsError};

#[test]
fn test_default_config_passes_validation() {
    assert!(validate_config(&RailConfig::default()).is_ok());
}

#[test]
fn test_zero_steps_per_revolution() {
    let mut config = RailConfig::default();
    config.motor.steps_per_revolution = 0;

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
    );
}

#[test]
fn test_non_finite_gear_ratio() {
    let mut config = RailConfig::default();
    config.motor.gear_ratio = f32::NAN;

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidGearRatio(_)))
    ));
}

#[test]
fn test_negative_travel() {
    let mut config = RailConfig::default();
    config.motor.max_travel = Millimeters(-1.0);

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidMaxTravel(-1.0)))
    );
}

#[test]
fn test_zero_homing_speed() {
    let mut config = RailConfig::default();
    config.homing.speed = MillimetersPerSec(0.0);

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSpeed(0.0)))
    );
}

#[test]
fn test_retract_longer_than_travel() {
    let mut config = RailConfig::default();
    config.homing.retract = Millimeters(120.0);

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidRetract(120.0)))
    );
}

#[test]
fn test_zero_windows_rejected() {
    let mut config = RailConfig::default();
    config.endstop.debounce = Milliseconds(0);
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidTiming(_)))
    ));

    let mut config = RailConfig::default();
    config.homing.retract_timeout = Milliseconds(0);
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidTiming(_)))
    ));
}

#[test]
fn test_invalid_default_shooting_settings() {
    let mut config = RailConfig::default();
    config.shooting.step = Millimeters(-0.3);

    assert_eq!(
        validate_config(&config),
        Err(Error::Settings(SettingsError::InvalidStep(-0.3)))
    );
}
