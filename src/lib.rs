//! # macro-rail
//!
//! Focus-stacking macro rail controller with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Non-blocking**: every operation is a single tick transition driven by a caller-supplied clock
//! - **embedded-hal 1.0**: `OutputPin` for STEP/DIR/ENABLE and camera lines, `InputPin` for the endstop
//! - **no_std compatible**: Core library works without standard library
//! - **Endstop homing**: debounced trigger, hard stop, settle, retract and a single zero reference
//! - **Photo sequencing**: focus/shutter timing between acceleration-limited moves
//! - **Explicit outcomes**: commands report `Applied`, `Unchanged` or why they were rejected
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use macro_rail::{Endstop, PinTrigger, RailConfig, RailControl, StepperMotorBuilder};
//!
//! let config: RailConfig = macro_rail::load_config("rail.toml")?;
//!
//! let motor = StepperMotorBuilder::new()
//!     .from_config(&config)
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .enable_pin(enable_pin)
//!     .delay(delay)
//!     .build()?;
//! let trigger = PinTrigger::new(focus_pin, shutter_pin)?;
//! let endstop = Endstop::new(endstop_pin, config.endstop.active_low);
//!
//! let mut rail = RailControl::new(motor, trigger, endstop, &config);
//! rail.start_homing()?;
//! loop {
//!     rail.poll(clock.now())?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets
//! - `log`: Enables logging through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first: logging macros used by every other module
#[macro_use]
mod fmt;

// Core modules
pub mod camera;
pub mod config;
pub mod control;
pub mod endstop;
pub mod error;
pub mod motion;
pub mod motor;
pub mod rail;
pub mod time;

// Re-exports for ergonomic API
pub use camera::{CameraTrigger, PinTrigger};
pub use config::{validate_config, RailConfig, ShootingSettings};
pub use control::{Command, CommandOutcome, RailControl, RailRunner, RailStatus, ShootRequest};
pub use endstop::{Debouncer, Endstop, EndstopInput};
pub use error::{Error, Result};
pub use motion::{Direction, MotionPhase};
pub use motor::{MotionDriver, SimulatedMotor, StepperMotor, StepperMotorBuilder};
pub use rail::{FaultKind, Rail, RailState};
pub use time::{Clock, Instant};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Microsteps, Millimeters, MillimetersPerSec, Milliseconds, Steps};
