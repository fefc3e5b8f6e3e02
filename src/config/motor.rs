//! Motor and drive-train configuration.

use serde::Deserialize;

use super::units::{Millimeters, MillimetersPerSec, MillimetersPerSecSquared, Microsteps};

/// Motor, lead screw and travel configuration (`[motor]` table).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Base full steps per motor revolution.
    pub steps_per_revolution: u16,

    /// Microstep setting of the driver.
    pub microsteps: Microsteps,

    /// Gear ratio between motor and screw (e.g. 109/12 reduction).
    pub gear_ratio: f32,

    /// Screw lead: carriage travel per screw revolution.
    #[serde(rename = "screw_lead_mm")]
    pub screw_lead: Millimeters,

    /// Usable travel from the homing zero to the far end.
    #[serde(rename = "max_travel_mm")]
    pub max_travel: Millimeters,

    /// Speed ceiling applied to every commanded move.
    #[serde(rename = "max_speed_mm_per_sec")]
    pub max_speed: MillimetersPerSec,

    /// Acceleration used for positioning and shooting moves.
    #[serde(rename = "acceleration_mm_per_sec2")]
    pub acceleration: MillimetersPerSecSquared,

    /// Invert direction pin logic.
    pub invert_direction: bool,

    /// Driver ENABLE input is active low.
    pub enable_active_low: bool,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: 100,
            microsteps: Microsteps::SIXTEENTH,
            gear_ratio: 109.0 / 12.0,
            screw_lead: Millimeters(2.0),
            max_travel: Millimeters(97.0),
            max_speed: MillimetersPerSec(5.0),
            acceleration: MillimetersPerSecSquared(100.0),
            invert_direction: true,
            enable_active_low: true,
        }
    }
}

impl MotorConfig {
    /// Microsteps per screw revolution (full steps × microsteps × gear ratio).
    pub fn steps_per_screw_revolution(&self) -> f32 {
        self.steps_per_revolution as f32 * self.microsteps.value() as f32 * self.gear_ratio
    }

    /// Microsteps per millimeter of carriage travel.
    pub fn steps_per_mm(&self) -> f32 {
        self.steps_per_screw_revolution() / self.screw_lead.0
    }
}
