//! Unit tests for TOML configuration parsing.

use macro_rail::config::units::Microsteps;
use macro_rail::config::{load_config, parse_config, RailConfig};

const FULL_CONFIG: &str = r#"
[motor]
steps_per_revolution = 200
microsteps = 8
gear_ratio = 5.0
screw_lead_mm = 1.0
max_travel_mm = 150.0
max_speed_mm_per_sec = 3.0
acceleration_mm_per_sec2 = 50.0
invert_direction = false
enable_active_low = false

[homing]
speed_mm_per_sec = 1.5
acceleration_mm_per_sec2 = 20.0
retract_mm = 0.5
settle_ms = 500
retract_timeout_ms = 10000

[endstop]
debounce_ms = 20
active_low = false

[control]
service_interval_ms = 25
home_on_start = false

[shooting]
photos = 60
step_mm = 0.02
max_speed_mm_per_sec = 0.4
focus_ms = 300
release_ms = 150
before_shoot_ms = 800
after_shoot_ms = 50
"#;

/// The compiled defaults match the stock rail hardware.
#[test]
fn test_default_config_matches_stock_rail() {
    let config = RailConfig::default();

    assert_eq!(config.motor.steps_per_revolution, 100);
    assert_eq!(config.motor.microsteps, Microsteps::SIXTEENTH);
    assert!((config.motor.gear_ratio - 109.0 / 12.0).abs() < 1e-5);
    assert_eq!(config.motor.screw_lead.0, 2.0);
    assert_eq!(config.motor.max_travel.0, 97.0);
    assert!(config.motor.invert_direction);
    assert!(config.motor.enable_active_low);

    assert_eq!(config.homing.retract.0, 1.0);
    assert_eq!(config.homing.settle.0, 1_000);
    assert_eq!(config.homing.retract_timeout.0, 60_000);
    assert_eq!(config.endstop.debounce.0, 50);
    assert_eq!(config.control.service_interval.0, 50);
    assert!(config.control.home_on_start);

    assert_eq!(config.shooting.photos, 3);
    assert_eq!(config.shooting.step.0, 0.3);
    assert_eq!(config.shooting.max_speed.0, 0.7);
    assert_eq!(config.shooting.focus_time.0, 500);
    assert_eq!(config.shooting.release_time.0, 200);
    assert_eq!(config.shooting.before_shoot_delay.0, 100);
    assert_eq!(config.shooting.after_shoot_delay.0, 100);
}

/// Stock drive train: 100 × 16 × 109/12 / 2 mm.
#[test]
fn test_default_steps_per_mm() {
    let mechanics = RailConfig::default().mechanics();

    assert!((mechanics.steps_per_mm - 7266.667).abs() < 0.01);
    assert_eq!(mechanics.max_travel_steps(), (97.0f32 * mechanics.steps_per_mm) as i64);
}

/// Test parsing every table.
#[test]
fn test_parse_full_config() {
    let config = parse_config(FULL_CONFIG).expect("Failed to parse TOML");

    assert_eq!(config.motor.microsteps.value(), 8);
    assert_eq!(config.motor.steps_per_mm(), 8_000.0);
    assert!(!config.motor.invert_direction);
    assert!(!config.motor.enable_active_low);

    assert_eq!(config.homing.speed.0, 1.5);
    assert_eq!(config.homing.retract.0, 0.5);
    assert_eq!(config.homing.retract_timeout.0, 10_000);

    assert_eq!(config.endstop.debounce.0, 20);
    assert!(!config.endstop.active_low);

    assert_eq!(config.control.service_interval.0, 25);
    assert!(!config.control.home_on_start);

    assert_eq!(config.shooting.photos, 60);
    assert_eq!(config.shooting.step.0, 0.02);
    assert_eq!(config.shooting.before_shoot_delay.0, 800);
}

/// Test that an invalid microstep value is rejected at parse time.
#[test]
fn test_invalid_microsteps_rejected() {
    let toml_str = r#"
[motor]
microsteps = 3
"#;

    assert!(parse_config(toml_str).is_err());
}

/// Test that unknown value types are reported as parse errors.
#[test]
fn test_wrong_type_is_parse_error() {
    let toml_str = r#"
[shooting]
photos = "many"
"#;

    let err = parse_config(toml_str).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error: Parse error"));
}

/// Test loading configuration from a file on disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join("macro_rail_load_config_test.toml");
    std::fs::write(&path, FULL_CONFIG).unwrap();

    let config = load_config(&path).expect("Failed to load config");
    assert_eq!(config.shooting.photos, 60);

    let _ = std::fs::remove_file(&path);
}
