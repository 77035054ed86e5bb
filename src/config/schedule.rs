//! Observation schedule.

use chrono::FixedOffset;
use serde::Deserialize;

use super::units::TimeOfDay;

/// Daily observation window and park time, in station local time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleConfig {
    /// Start of the observation window.
    pub start: TimeOfDay,

    /// End of the observation window.
    pub stop: TimeOfDay,

    /// Time of day at which the antenna parks.
    pub park: TimeOfDay,

    /// Offset of station local time from UTC.
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// How long before `start` the window opens.
    #[serde(default = "default_lead_minutes")]
    pub lead_minutes: u32,

    /// Half width of the park window around `park`.
    #[serde(default = "default_park_window_minutes")]
    pub park_window_minutes: u32,

    /// Time spent parked before re-homing.
    #[serde(default = "default_park_dwell_secs")]
    pub park_dwell_secs: u32,

    /// Poll period of the gate.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u32,

    /// Park orientation relative to home on the hour-angle axis.
    #[serde(default = "default_park_offset_deg", rename = "park_offset_deg")]
    pub park_offset: f64,

    /// Longest a schedule or sunrise wait may block before it gives up.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u32,
}

fn default_lead_minutes() -> u32 {
    60
}

fn default_park_window_minutes() -> u32 {
    15
}

fn default_park_dwell_secs() -> u32 {
    1800
}

fn default_poll_interval_secs() -> u32 {
    30
}

fn default_park_offset_deg() -> f64 {
    90.0
}

fn default_max_wait_secs() -> u32 {
    48 * 3600
}

impl ScheduleConfig {
    /// Local time zone of the schedule, if the offset is representable.
    pub fn offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        let at = |h, m| TimeOfDay(chrono::NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default());
        Self {
            start: at(7, 0),
            stop: at(17, 0),
            park: at(22, 0),
            utc_offset_minutes: 60,
            lead_minutes: default_lead_minutes(),
            park_window_minutes: default_park_window_minutes(),
            park_dwell_secs: default_park_dwell_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            park_offset: default_park_offset_deg(),
            max_wait_secs: default_max_wait_secs(),
        }
    }
}
