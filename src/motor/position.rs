//! Absolute step position of one axis.

use crate::config::units::{Degrees, Steps};

/// Absolute position tracker.
///
/// Counts steps from the hardware zero; converts to the axis angle the steps
/// correspond to.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    /// Current position in steps (from the hardware zero)
    steps: Steps,
    /// Degrees per step for conversions
    degrees_per_step: f64,
}

impl Position {
    /// Create a position tracker at a specific position.
    #[inline]
    pub fn at(steps: Steps, degrees_per_step: f64) -> Self {
        Self {
            steps,
            degrees_per_step,
        }
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Angle of the current position relative to the hardware zero.
    #[inline]
    pub fn degrees(&self) -> Degrees {
        self.steps.to_degrees(self.degrees_per_step)
    }

    /// Set position in steps.
    #[inline]
    pub fn set_steps(&mut self, steps: Steps) {
        self.steps = steps;
    }

    /// Move by a number of steps.
    #[inline]
    pub fn move_steps(&mut self, delta: i64) {
        self.steps = Steps(self.steps.0 + delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tracking() {
        let mut pos = Position::at(Steps(621_000), 1.0 / 3450.0);

        pos.move_steps(3450);
        assert_eq!(pos.steps(), Steps(624_450));
        assert!((pos.degrees().value() - 181.0).abs() < 1e-9);

        pos.move_steps(-624_450);
        assert_eq!(pos.steps().value(), 0);
    }
}
