//! Configuration module for macro-rail.
//!
//! Provides types for loading and validating the rail configuration from
//! TOML files (with `std` feature) or building it in code. Every value has a
//! compiled default, so an empty file is a valid configuration.

mod homing;
mod limits;
mod mechanical;
mod motor;
mod shooting;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use homing::{EndstopConfig, HomingConfig};
pub use limits::TravelLimits;
pub use mechanical::RailMechanics;
pub use motor::MotorConfig;
pub use shooting::ShootingSettings;
pub use system::{ControlConfig, RailConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Microsteps, Millimeters, MillimetersPerSec, MillimetersPerSecSquared, Milliseconds, Steps};
