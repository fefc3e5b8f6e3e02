//! Homing and endstop configuration.

use serde::Deserialize;

use super::units::{Millimeters, MillimetersPerSec, MillimetersPerSecSquared, Milliseconds};

/// Homing procedure parameters (`[homing]` table).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HomingConfig {
    /// Speed of the approach toward the endstop.
    #[serde(rename = "speed_mm_per_sec")]
    pub speed: MillimetersPerSec,

    /// Acceleration of the approach toward the endstop.
    #[serde(rename = "acceleration_mm_per_sec2")]
    pub acceleration: MillimetersPerSecSquared,

    /// Distance backed off the endstop after it triggers.
    #[serde(rename = "retract_mm")]
    pub retract: Millimeters,

    /// Pause with the motor disabled after the endstop triggers.
    #[serde(rename = "settle_ms")]
    pub settle: Milliseconds,

    /// Ceiling on the retract move before it is treated as a stall.
    #[serde(rename = "retract_timeout_ms")]
    pub retract_timeout: Milliseconds,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            speed: MillimetersPerSec(2.0),
            acceleration: MillimetersPerSecSquared(100.0),
            retract: Millimeters(1.0),
            settle: Milliseconds(1_000),
            retract_timeout: Milliseconds(60_000),
        }
    }
}

/// Endstop input parameters (`[endstop]` table).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndstopConfig {
    /// Minimum time the raw level must hold before it is trusted.
    #[serde(rename = "debounce_ms")]
    pub debounce: Milliseconds,

    /// The switch pulls the input low when pressed.
    pub active_low: bool,
}

impl Default for EndstopConfig {
    fn default() -> Self {
        Self {
            debounce: Milliseconds(50),
            active_low: true,
        }
    }
}
