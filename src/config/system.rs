//! Rail configuration - root configuration structure.

use serde::Deserialize;

use super::homing::{EndstopConfig, HomingConfig};
use super::mechanical::RailMechanics;
use super::motor::MotorConfig;
use super::shooting::ShootingSettings;
use super::units::Milliseconds;

/// Request servicing parameters (`[control]` table).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Interval at which queued control requests are applied.
    #[serde(rename = "service_interval_ms")]
    pub service_interval: Milliseconds,

    /// Queue a homing run when the runner starts.
    pub home_on_start: bool,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            service_interval: Milliseconds(50),
            home_on_start: true,
        }
    }
}

/// Root configuration structure from TOML.
///
/// Every table is optional; missing tables and fields fall back to the
/// compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RailConfig {
    /// Motor and drive train.
    pub motor: MotorConfig,

    /// Homing procedure.
    pub homing: HomingConfig,

    /// Endstop input.
    pub endstop: EndstopConfig,

    /// Control request servicing.
    pub control: ControlConfig,

    /// Default shooting settings.
    pub shooting: ShootingSettings,
}

impl RailConfig {
    /// Derive the mechanical constraints of the configured motor.
    pub fn mechanics(&self) -> RailMechanics {
        RailMechanics::from_config(&self.motor)
    }
}
