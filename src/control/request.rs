//! Partial shooting settings as sent by a client.

use core::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use crate::config::units::{Millimeters, MillimetersPerSec, Milliseconds};
use crate::config::ShootingSettings;

/// A shoot request. Absent fields keep the rail's current settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct ShootRequest {
    /// Number of photos.
    pub photos: Option<u16>,
    /// Carriage advance between photos, in mm.
    pub step: Option<f32>,
    /// Max carriage speed, in mm/s.
    pub speed: Option<f32>,
    /// Delay before focusing, in ms.
    pub before: Option<u32>,
    /// Delay after the exposure, in ms.
    pub after: Option<u32>,
    /// Focus hold, in ms.
    pub focus_time: Option<u32>,
    /// Shutter hold, in ms.
    pub release_time: Option<u32>,
    /// Return to the start position after the last photo. Off when absent.
    #[serde(deserialize_with = "flag")]
    pub return_to_start: bool,
}

impl ShootRequest {
    /// Overlay the present fields onto `base`.
    pub fn apply_to(&self, base: &ShootingSettings) -> ShootingSettings {
        let mut settings = *base;
        if let Some(photos) = self.photos {
            settings.photos = photos;
        }
        if let Some(step) = self.step {
            settings.step = Millimeters(step);
        }
        if let Some(speed) = self.speed {
            settings.max_speed = MillimetersPerSec(speed);
        }
        if let Some(before) = self.before {
            settings.before_shoot_delay = Milliseconds(before);
        }
        if let Some(after) = self.after {
            settings.after_shoot_delay = Milliseconds(after);
        }
        if let Some(focus) = self.focus_time {
            settings.focus_time = Milliseconds(focus);
        }
        if let Some(release) = self.release_time {
            settings.release_time = Milliseconds(release);
        }
        settings
    }
}

/// Accepts `true`/`false`, `1`/`0` and the strings `"1"`/`"true"`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean, 0/1, or \"1\"")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v == 1)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v == 1)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            Ok(v == "1" || v == "true")
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_keeps_settings() {
        let base = ShootingSettings::default();
        let merged = ShootRequest::default().apply_to(&base);
        assert_eq!(merged, base);
    }

    #[test]
    fn test_partial_request_overrides() {
        let base = ShootingSettings::default();
        let request = ShootRequest {
            photos: Some(10),
            step: Some(0.05),
            release_time: Some(300),
            ..ShootRequest::default()
        };
        let merged = request.apply_to(&base);

        assert_eq!(merged.photos, 10);
        assert_eq!(merged.step, Millimeters(0.05));
        assert_eq!(merged.release_time, Milliseconds(300));
        assert_eq!(merged.focus_time, base.focus_time);
        assert_eq!(merged.max_speed, base.max_speed);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_deserialize_request_names() {
        let request: ShootRequest = toml::from_str(
            r#"
            photos = 5
            speed = 1.5
            before = 250
            return_to_start = "1"
            "#,
        )
        .unwrap();

        assert_eq!(request.photos, Some(5));
        assert_eq!(request.speed, Some(1.5));
        assert_eq!(request.before, Some(250));
        assert_eq!(request.after, None);
        assert!(request.return_to_start);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_return_to_start_defaults_off() {
        let request: ShootRequest = toml::from_str("photos = 2").unwrap();
        assert!(!request.return_to_start);

        let request: ShootRequest = toml::from_str(r#"return_to_start = "0""#).unwrap();
        assert!(!request.return_to_start);
    }
}
