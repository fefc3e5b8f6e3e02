//! Motion module for macro-rail.
//!
//! Provides the non-blocking acceleration ramp shared by every motor driver.

mod ramp;

pub use ramp::{Direction, MotionPhase, SpeedRamp};
