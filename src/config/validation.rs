//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{AxisConfig, MountConfig, ScheduleConfig, TrackingConfig};

/// Validate a mount configuration.
///
/// Checks:
/// - Site coordinates are on the globe
/// - Axis transmission, speed and acceleration are positive
/// - Seek and chunk bounds are non-zero
/// - Soft limits are valid (min < max)
/// - The dead-band covers at least one step of each axis
/// - The observation window is ordered and the UTC offset representable
pub fn validate_config(config: &MountConfig) -> Result<()> {
    if !config.site.is_valid() {
        return Err(Error::Config(ConfigError::InvalidSite {
            latitude: config.site.latitude,
            longitude: config.site.longitude,
        }));
    }

    validate_axis(&config.axes.hour_angle)?;
    validate_axis(&config.axes.declination)?;
    validate_tracking(&config.tracking, &config.axes.hour_angle)?;
    validate_tracking(&config.tracking, &config.axes.declination)?;
    validate_schedule(&config.schedule)?;

    Ok(())
}

fn validate_axis(config: &AxisConfig) -> Result<()> {
    if config.steps_per_degree.is_nan() || config.steps_per_degree <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerDegree(
            config.steps_per_degree,
        )));
    }

    if config.max_speed.is_nan() || config.max_speed <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed(config.max_speed)));
    }

    if config.max_acceleration.is_nan() || config.max_acceleration <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxAcceleration(
            config.max_acceleration,
        )));
    }

    if config.max_seek_steps == 0 {
        return Err(Error::Config(ConfigError::InvalidStepBound("max_seek_steps")));
    }

    if config.chunk_steps == 0 {
        return Err(Error::Config(ConfigError::InvalidStepBound("chunk_steps")));
    }

    if let Some(ref limits) = config.limits {
        if !limits.is_valid() {
            return Err(Error::Config(ConfigError::InvalidSoftLimits {
                min: limits.min.0,
                max: limits.max.0,
            }));
        }
    }

    Ok(())
}

fn validate_tracking(tracking: &TrackingConfig, axis: &AxisConfig) -> Result<()> {
    // a dead-band narrower than one step can never be reached
    let step = axis.degrees_per_step();
    if tracking.deadband.is_nan() || tracking.deadband < step || tracking.deadband >= 180.0 {
        return Err(Error::Config(ConfigError::InvalidDeadband {
            deadband: tracking.deadband,
            step,
        }));
    }

    if tracking.max_goto_steps == 0 {
        return Err(Error::Config(ConfigError::InvalidStepBound("max_goto_steps")));
    }

    if tracking.cancel_poll_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidStepBound("cancel_poll_ms")));
    }

    Ok(())
}

fn validate_schedule(schedule: &ScheduleConfig) -> Result<()> {
    if schedule.offset().is_none() {
        return Err(Error::Config(ConfigError::InvalidUtcOffset(
            schedule.utc_offset_minutes,
        )));
    }

    if schedule.start >= schedule.stop {
        return Err(Error::Config(ConfigError::InvalidWindow));
    }

    Ok(())
}
