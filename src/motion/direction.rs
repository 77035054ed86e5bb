//! Step direction and the shortest-arc rule.

use serde::Deserialize;

use crate::config::units::Degrees;

/// Direction of one axis move.
///
/// `Forward` increases both the absolute step count and the pointing angle
/// of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive step count.
    #[default]
    Forward,
    /// Negative step count.
    Backward,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// Direction that turns `current` toward `target` through the smaller arc.
    ///
    /// The naive sign of `target - current` is inverted whenever the naive
    /// separation exceeds 180 degrees. A separation of exactly 180 degrees
    /// resolves to `Forward`.
    pub fn shortest_arc(current: Degrees, target: Degrees) -> Self {
        let naive = target.0 - current.0;
        let separation = libm::fabs(naive);
        let naive_direction = if naive >= 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        };

        if separation > 180.0 {
            naive_direction.reversed()
        } else if separation == 180.0 {
            Direction::Forward
        } else {
            naive_direction
        }
    }
}
