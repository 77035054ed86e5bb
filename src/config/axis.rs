//! Axis configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::limits::SoftLimits;
use super::units::{Degrees, Steps};
use crate::motion::Direction;

/// Complete configuration of one mount axis: motor, driver and home switch.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Transmission ratio: driver steps (including microsteps) per degree of
    /// antenna motion.
    #[serde(default = "default_steps_per_degree")]
    pub steps_per_degree: f64,

    /// Maximum step rate in steps per second.
    #[serde(default = "default_max_speed", rename = "max_speed_steps_per_sec")]
    pub max_speed: f32,

    /// Maximum acceleration in steps per second squared.
    #[serde(default = "default_max_acceleration", rename = "max_acceleration_steps_per_sec2")]
    pub max_acceleration: f32,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Driver outputs are enabled by pulling the enable pin low.
    #[serde(default = "default_true")]
    pub enable_active_low: bool,

    /// Absolute step count recorded when the home switch triggers.
    #[serde(rename = "home_position_steps")]
    pub home_position: Steps,

    /// Home hour angle (hour-angle axis) or home declination (declination axis).
    #[serde(rename = "home_angle_deg")]
    pub home_angle: Degrees,

    /// Direction to step while seeking the home switch.
    #[serde(default)]
    pub seek_direction: Direction,

    /// Seek bound; exceeding it is reported as a stall.
    #[serde(default = "default_max_seek_steps")]
    pub max_seek_steps: u64,

    /// Largest relative move handed to the driver in one call.
    #[serde(default = "default_chunk_steps")]
    pub chunk_steps: u32,

    /// The optical switch reads low when triggered.
    #[serde(default = "default_true")]
    pub switch_active_low: bool,

    /// Optional soft limits on commanded targets.
    #[serde(default)]
    pub limits: Option<SoftLimits>,
}

fn default_steps_per_degree() -> f64 {
    3450.0
}

fn default_max_speed() -> f32 {
    2000.0
}

fn default_max_acceleration() -> f32 {
    4000.0
}

fn default_max_seek_steps() -> u64 {
    // a full turn of the default transmission
    360 * 3450
}

fn default_chunk_steps() -> u32 {
    3450
}

fn default_true() -> bool {
    true
}

impl AxisConfig {
    /// The hour-angle axis of the reference station.
    pub fn hour_angle() -> Self {
        Self::with_home("hour_angle", Steps(172_500), Degrees(-90.0))
    }

    /// The declination axis of the reference station.
    pub fn declination() -> Self {
        let mut config = Self::with_home("declination", Steps(345_000), Degrees(-45.0));
        config.limits = Some(SoftLimits::sky());
        config
    }

    fn with_home(name: &str, home_position: Steps, home_angle: Degrees) -> Self {
        Self {
            name: String::try_from(name).unwrap_or_default(),
            steps_per_degree: default_steps_per_degree(),
            max_speed: default_max_speed(),
            max_acceleration: default_max_acceleration(),
            invert_direction: false,
            enable_active_low: true,
            home_position,
            home_angle,
            seek_direction: Direction::Forward,
            max_seek_steps: default_max_seek_steps(),
            chunk_steps: default_chunk_steps(),
            switch_active_low: true,
            limits: None,
        }
    }

    /// Angle moved by one step.
    pub fn degrees_per_step(&self) -> f64 {
        1.0 / self.steps_per_degree
    }

    /// Steps in one full turn of the axis.
    pub fn steps_per_revolution(&self) -> i64 {
        libm::round(self.steps_per_degree * 360.0) as i64
    }

    /// Position assumed at power-up, before homing: the middle of one turn.
    pub fn startup_position(&self) -> Steps {
        Steps(self.steps_per_revolution() / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_constants() {
        let ha = AxisConfig::hour_angle();
        assert_eq!(ha.steps_per_revolution(), 1_242_000);
        assert_eq!(ha.startup_position(), Steps(621_000));
        assert_eq!(ha.home_position, Steps(172_500));
        assert_eq!(ha.home_angle, Degrees(-90.0));
        assert!((ha.degrees_per_step() - 1.0 / 3450.0).abs() < 1e-15);

        let dec = AxisConfig::declination();
        assert_eq!(dec.home_position, Steps(345_000));
        assert_eq!(dec.home_angle, Degrees(-45.0));
        assert!(dec.limits.is_some());
    }
}
