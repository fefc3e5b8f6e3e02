//! Error types for macro-rail.
//!
//! Provides unified error handling across configuration, hardware access and
//! shooting settings. Mechanical faults are not errors: they are reported as
//! [`RailState::Error`](crate::rail::RailState::Error) with a
//! [`FaultKind`](crate::rail::FaultKind).

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all macro-rail operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor, endstop or trigger hardware error
    Motor(MotorError),
    /// Invalid shooting settings
    Settings(SettingsError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Invalid full steps per revolution (must be > 0)
    InvalidStepsPerRevolution(u16),
    /// Invalid gear ratio (must be > 0)
    InvalidGearRatio(f32),
    /// Invalid screw lead (must be > 0)
    InvalidScrewLead(f32),
    /// Invalid travel length (must be > 0)
    InvalidMaxTravel(f32),
    /// Invalid speed (must be > 0)
    InvalidSpeed(f32),
    /// Invalid acceleration (must be > 0)
    InvalidAcceleration(f32),
    /// Invalid retract distance (must be > 0 and shorter than the travel)
    InvalidRetract(f32),
    /// Invalid timing value (must be > 0)
    InvalidTiming(&'static str),
    /// Required builder field not provided
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Hardware errors raised while driving pins.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// STEP, DIR or ENABLE pin operation failed
    PinError,
    /// Endstop input could not be read
    EndstopReadError,
    /// Focus or shutter output could not be driven
    TriggerPinError,
}

/// Shooting settings rejected before a run starts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Photo count must be at least 1
    NoPhotos,
    /// Step size must be finite and non-negative
    InvalidStep(f32),
    /// Max speed must be finite and positive
    InvalidSpeed(f32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Settings(e) => write!(f, "Settings error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidGearRatio(v) => write!(f, "Invalid gear ratio: {}. Must be > 0", v),
            ConfigError::InvalidScrewLead(v) => write!(f, "Invalid screw lead: {} mm. Must be > 0", v),
            ConfigError::InvalidMaxTravel(v) => write!(f, "Invalid max travel: {} mm. Must be > 0", v),
            ConfigError::InvalidSpeed(v) => write!(f, "Invalid speed: {} mm/s. Must be > 0", v),
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {} mm/s². Must be > 0", v)
            }
            ConfigError::InvalidRetract(v) => {
                write!(f, "Invalid retract distance: {} mm. Must be > 0 and within travel", v)
            }
            ConfigError::InvalidTiming(field) => write!(f, "Invalid timing for '{}'. Must be > 0", field),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::EndstopReadError => write!(f, "Endstop input could not be read"),
            MotorError::TriggerPinError => write!(f, "Camera trigger output failed"),
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::NoPhotos => write!(f, "Photo count must be at least 1"),
            SettingsError::InvalidStep(v) => write!(f, "Invalid step size: {} mm. Must be >= 0", v),
            SettingsError::InvalidSpeed(v) => write!(f, "Invalid max speed: {} mm/s. Must be > 0", v),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<SettingsError> for Error {
    fn from(e: SettingsError) -> Self {
        Error::Settings(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for SettingsError {}
