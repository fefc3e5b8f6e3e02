//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::RailConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use macro_rail::load_config;
///
/// let config = load_config("rail.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RailConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = truncated(&e.to_string());
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<RailConfig> {
    let config: RailConfig = toml::from_str(content)
        .map_err(|e| Error::Config(ConfigError::ParseError(truncated(e.message()))))?;

    // Validate the configuration
    super::validation::validate_config(&config)?;

    Ok(config)
}

fn truncated(msg: &str) -> heapless::String<128> {
    let mut out = heapless::String::new();
    for c in msg.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.shooting.photos, 3);
        assert_eq!(config.endstop.debounce.0, 50);
    }

    #[test]
    fn test_parse_partial_tables() {
        let toml = r#"
[motor]
steps_per_revolution = 200
microsteps = 1
gear_ratio = 1.0
screw_lead_mm = 2.0

[shooting]
photos = 40
step_mm = 0.05
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.motor.steps_per_mm(), 100.0);
        assert_eq!(config.shooting.photos, 40);
        // Untouched fields keep their defaults
        assert_eq!(config.shooting.focus_time.0, 500);
        assert_eq!(config.homing.retract_timeout.0, 60_000);
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let toml = r#"
[shooting]
photos = 0
"#;

        assert!(matches!(parse_config(toml), Err(Error::Settings(_))));
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let long = "x".repeat(500);
        assert_eq!(truncated(&long).len(), 128);
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/rail.toml");
        assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
    }
}
