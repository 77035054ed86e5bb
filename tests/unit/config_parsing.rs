//! Unit tests for TOML configuration parsing.

use solar_mount::config::{load_config, parse_config, LimitPolicy, MountConfig};
use solar_mount::Direction;

const STATION: &str = r#"
state_file = "/var/lib/solar-mount/lastPos.txt"

[site]
latitude_deg = 45.2756
longitude_deg = 13.7208

[axes.hour_angle]
name = "ha"
steps_per_degree = 3450.0
home_position_steps = 172500
home_angle_deg = -90.0
seek_direction = "backward"

[axes.declination]
name = "dec"
steps_per_degree = 1725.0
home_position_steps = 345000
home_angle_deg = -45.0
invert_direction = true

[axes.declination.limits]
min_degrees = -60.0
max_degrees = 60.0
policy = "clamp"

[tracking]
deadband_deg = 0.02
min_sun_altitude_deg = 5.0

[schedule]
start = "06:30"
stop = "18:00"
park = "22:00"
utc_offset_minutes = 120
"#;

/// Test parsing a complete station description.
#[test]
fn test_parse_station_config() {
    let config: MountConfig = toml::from_str(STATION).expect("Failed to parse TOML");

    assert_eq!(config.state_file.as_str(), "/var/lib/solar-mount/lastPos.txt");
    assert_eq!(config.site.latitude, 45.2756);
    assert_eq!(config.site.elevation, 0.0);

    let ha = &config.axes.hour_angle;
    assert_eq!(ha.name.as_str(), "ha");
    assert_eq!(ha.home_position.0, 172_500);
    assert_eq!(ha.home_angle.0, -90.0);
    assert_eq!(ha.seek_direction, Direction::Backward);
    assert!(ha.limits.is_none());

    let dec = &config.axes.declination;
    assert_eq!(dec.steps_per_degree, 1725.0);
    assert!(dec.invert_direction);
    assert_eq!(dec.seek_direction, Direction::Forward);
    let limits = dec.limits.as_ref().expect("declination limits");
    assert_eq!(limits.min.0, -60.0);
    assert_eq!(limits.policy, LimitPolicy::Clamp);

    assert_eq!(config.tracking.deadband, 0.02);
    assert_eq!(config.tracking.min_sun_altitude, 5.0);
    assert_eq!(config.tracking.max_manual_steps, 1_242_000);

    assert_eq!(config.schedule.utc_offset_minutes, 120);
    assert_eq!(config.schedule.park_offset, 90.0);
}

/// Test that omitted sections fall back to the reference station.
#[test]
fn test_defaults_for_missing_sections() {
    let config = parse_config("[tracking]\nprint_interval_ms = 5000\n").unwrap();

    assert_eq!(config.tracking.print_interval_ms, 5000);
    assert_eq!(config.tracking.deadband, 0.01);
    assert_eq!(config.axes.hour_angle.steps_per_degree, 3450.0);
    assert_eq!(config.axes.declination.home_position.0, 345_000);
    assert_eq!(config.schedule.park_dwell_secs, 1800);
}

/// Test that an axis without its home position is rejected.
#[test]
fn test_missing_home_position_rejected() {
    let toml = STATION.replace("home_position_steps = 172500\n", "");
    assert!(parse_config(&toml).is_err());
}

/// Test loading from a file on disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("solar-mount-config-{}.toml", std::process::id()));
    std::fs::write(&path, STATION).unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.schedule.start.seconds_from_midnight(), 6 * 3600 + 1800);

    let _ = std::fs::remove_file(&path);
}

/// Test that a missing file is reported, not panicked on.
#[test]
fn test_load_missing_file() {
    assert!(load_config("/nonexistent/solar-mount.toml").is_err());
}
