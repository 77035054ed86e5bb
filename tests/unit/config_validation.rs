//! Unit tests for configuration validation.

use solar_mount::config::{parse_config, validate_config, MountConfig};
use solar_mount::error::{ConfigError, Error};

/// Test validation of the reference station.
#[test]
fn test_default_config_passes_validation() {
    assert!(validate_config(&MountConfig::default()).is_ok());
}

/// Test validation fails for a dead-band narrower than one step.
#[test]
fn test_deadband_below_one_step() {
    let result = parse_config("[tracking]\ndeadband_deg = 0.0001\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidDeadband { .. }))
    ));
}

/// Test validation fails for a site off the globe.
#[test]
fn test_site_out_of_range() {
    let result = parse_config("[site]\nlatitude_deg = 91.0\nlongitude_deg = 0.0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidSite { .. }))
    ));
}

/// Test validation fails for an inverted observation window.
#[test]
fn test_window_must_be_ordered() {
    let toml = r#"
[schedule]
start = "18:00"
stop = "07:00"
park = "22:00"
"#;
    assert!(matches!(
        parse_config(toml),
        Err(Error::Config(ConfigError::InvalidWindow))
    ));
}

/// Test validation fails for an unrepresentable UTC offset.
#[test]
fn test_utc_offset_range() {
    let mut config = MountConfig::default();
    config.schedule.utc_offset_minutes = 25 * 60;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidUtcOffset(1500)))
    ));
}

/// Test validation fails for inverted soft limits.
#[test]
fn test_inverted_soft_limits() {
    let mut config = MountConfig::default();
    if let Some(limits) = config.axes.declination.limits.as_mut() {
        limits.min.0 = 10.0;
        limits.max.0 = -10.0;
    }
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSoftLimits { .. }))
    ));
}

/// Test validation fails for zero-sized step bounds.
#[test]
fn test_zero_step_bounds() {
    let mut config = MountConfig::default();
    config.axes.hour_angle.chunk_steps = 0;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidStepBound("chunk_steps")))
    ));

    let mut config = MountConfig::default();
    config.tracking.max_goto_steps = 0;
    assert!(validate_config(&config).is_err());
}

/// Test validation fails for a non-positive transmission.
#[test]
fn test_non_positive_transmission() {
    let mut config = MountConfig::default();
    config.axes.declination.steps_per_degree = -1.0;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidStepsPerDegree(_)))
    ));
}
