//! Mechanical constraints derived from axis configuration.

use super::axis::AxisConfig;

/// Derived mechanical parameters computed from axis configuration.
///
/// These are computed once when a pin driver is built and feed its ramps.
#[derive(Debug, Clone, PartialEq)]
pub struct MechanicalConstraints {
    /// Total steps per output revolution.
    pub steps_per_revolution: i64,

    /// Maximum velocity in steps per second.
    pub max_velocity_steps_per_sec: f32,

    /// Maximum acceleration in steps per second squared.
    pub max_acceleration_steps_per_sec2: f32,
}

impl MechanicalConstraints {
    /// Compute mechanical constraints from axis configuration.
    pub fn from_config(config: &AxisConfig) -> Self {
        Self {
            steps_per_revolution: config.steps_per_revolution(),
            max_velocity_steps_per_sec: config.max_speed,
            max_acceleration_steps_per_sec2: config.max_acceleration,
        }
    }
}
