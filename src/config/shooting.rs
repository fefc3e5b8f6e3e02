//! Shooting settings: the value object frozen for one focus-stacking run.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

use super::units::{Millimeters, MillimetersPerSec, Milliseconds};

/// Parameters of one shooting run (`[shooting]` table holds the defaults).
///
/// Copied into the rail when a run starts and never mutated until it ends.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShootingSettings {
    /// Number of photos to take (at least 1).
    pub photos: u16,

    /// Carriage advance between two photos.
    #[serde(rename = "step_mm")]
    pub step: Millimeters,

    /// Speed of the advance moves.
    #[serde(rename = "max_speed_mm_per_sec")]
    pub max_speed: MillimetersPerSec,

    /// How long the focus line is held before the shutter fires.
    #[serde(rename = "focus_ms")]
    pub focus_time: Milliseconds,

    /// How long the shutter line is held.
    #[serde(rename = "release_ms")]
    pub release_time: Milliseconds,

    /// Settling delay between arriving and focusing.
    #[serde(rename = "before_shoot_ms")]
    pub before_shoot_delay: Milliseconds,

    /// Delay between releasing the shutter and the next advance.
    #[serde(rename = "after_shoot_ms")]
    pub after_shoot_delay: Milliseconds,
}

impl Default for ShootingSettings {
    fn default() -> Self {
        Self {
            photos: 3,
            step: Millimeters(0.3),
            max_speed: MillimetersPerSec(0.7),
            focus_time: Milliseconds(500),
            release_time: Milliseconds(200),
            before_shoot_delay: Milliseconds(100),
            after_shoot_delay: Milliseconds(100),
        }
    }
}

impl ShootingSettings {
    /// Check the settings before a run starts.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] for a zero photo count, a negative or
    /// non-finite step, or a non-positive or non-finite speed.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.photos == 0 {
            return Err(SettingsError::NoPhotos);
        }
        if !self.step.0.is_finite() || self.step.0 < 0.0 {
            return Err(SettingsError::InvalidStep(self.step.0));
        }
        if !self.max_speed.0.is_finite() || self.max_speed.0 <= 0.0 {
            return Err(SettingsError::InvalidSpeed(self.max_speed.0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ShootingSettings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = ShootingSettings::default();

        let none = ShootingSettings { photos: 0, ..base };
        assert_eq!(none.validate(), Err(SettingsError::NoPhotos));

        let backwards = ShootingSettings { step: Millimeters(-0.1), ..base };
        assert!(matches!(backwards.validate(), Err(SettingsError::InvalidStep(_))));

        let stalled = ShootingSettings { max_speed: MillimetersPerSec(0.0), ..base };
        assert!(matches!(stalled.validate(), Err(SettingsError::InvalidSpeed(_))));

        let nan = ShootingSettings { step: Millimeters(f32::NAN), ..base };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_zero_step_is_allowed() {
        // Repeated exposures at one position
        let still = ShootingSettings { step: Millimeters(0.0), ..ShootingSettings::default() };
        assert!(still.validate().is_ok());
    }
}
