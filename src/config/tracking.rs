//! Tracking loop tuning.

use serde::Deserialize;

/// Parameters of the pointing control loop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Error below which a one-shot goto counts as reached, in degrees.
    #[serde(rename = "deadband_deg")]
    pub deadband: f64,

    /// Apparent drift of a parked mount in right ascension, degrees/second.
    #[serde(rename = "earth_rotation_deg_per_sec")]
    pub earth_rotation_rate: f64,

    /// Minimum time between two status lines.
    pub print_interval_ms: u32,

    /// Pause after every single step.
    pub step_settle_us: u32,

    /// Pause of the tracking loop when no step was needed.
    pub idle_interval_ms: u32,

    /// Poll period while waiting for the sun to rise.
    pub sunrise_poll_ms: u32,

    /// Sun altitude above which the sun is tracked, in degrees.
    #[serde(rename = "min_sun_altitude_deg")]
    pub min_sun_altitude: f64,

    /// Step budget of a one-shot goto.
    pub max_goto_steps: u64,

    /// Largest operator jog, in steps.
    pub max_manual_steps: u64,

    /// Slice length of cancellable sleeps.
    pub cancel_poll_ms: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            deadband: 0.01,
            earth_rotation_rate: 1.0 / 240.0,
            print_interval_ms: 1000,
            step_settle_us: 1000,
            idle_interval_ms: 1000,
            sunrise_poll_ms: 15_000,
            min_sun_altitude: 0.0,
            // one and a half turns of the reference transmission
            max_goto_steps: 1_863_000,
            max_manual_steps: 1_242_000,
            cancel_poll_ms: 250,
        }
    }
}
