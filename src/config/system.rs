//! Mount configuration - root configuration structure.

use heapless::String;
use serde::Deserialize;

use super::axis::AxisConfig;
use super::schedule::ScheduleConfig;
use super::site::ObserverLocation;
use super::tracking::TrackingConfig;

/// The two motorized axes of the mount.
#[derive(Debug, Clone, Deserialize)]
pub struct AxesConfig {
    /// Hour-angle (right ascension) axis.
    pub hour_angle: AxisConfig,

    /// Declination axis.
    pub declination: AxisConfig,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            hour_angle: AxisConfig::hour_angle(),
            declination: AxisConfig::declination(),
        }
    }
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct MountConfig {
    /// Where the station is.
    #[serde(default)]
    pub site: ObserverLocation,

    /// Motor and home-switch settings per axis.
    #[serde(default)]
    pub axes: AxesConfig,

    /// Control loop tuning.
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Daily observation schedule.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// File receiving the last known position on shutdown.
    #[serde(default = "default_state_file")]
    pub state_file: String<64>,
}

fn default_state_file() -> String<64> {
    String::try_from("lastPos.txt").unwrap_or_default()
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            site: ObserverLocation::default(),
            axes: AxesConfig::default(),
            tracking: TrackingConfig::default(),
            schedule: ScheduleConfig::default(),
            state_file: default_state_file(),
        }
    }
}
