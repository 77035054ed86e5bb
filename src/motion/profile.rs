//! Motion profile calculation.
//!
//! Symmetric trapezoidal ramps for relative moves handed to a pin-level
//! stepper driver. Short moves (such as the single steps of the tracking
//! loop) degenerate to a triangle starting from the pull-in rate.

use libm::sqrtf;

use super::direction::Direction;

/// Current phase of motion execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    /// Accelerating from rest toward cruise velocity.
    Accelerating,
    /// Moving at constant cruise velocity.
    Cruising,
    /// Decelerating from cruise velocity to rest.
    Decelerating,
    /// Motion complete.
    Complete,
}

/// Computed motion profile for a relative move.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionProfile {
    /// Total steps to move (absolute value).
    pub total_steps: u32,

    /// Direction of motion.
    pub direction: Direction,

    /// Steps in acceleration phase.
    pub accel_steps: u32,

    /// Steps in cruise phase (constant velocity).
    pub cruise_steps: u32,

    /// Steps in deceleration phase.
    pub decel_steps: u32,

    /// Cruise step interval (nanoseconds) - at max velocity.
    pub cruise_interval_ns: u32,

    /// Acceleration (and deceleration) rate in steps/sec².
    pub accel_rate: f32,
}

impl MotionProfile {
    /// Create a symmetric trapezoidal profile.
    ///
    /// # Arguments
    ///
    /// * `total_steps` - Signed step count (positive = forward)
    /// * `max_velocity` - Maximum velocity in steps/sec
    /// * `acceleration` - Acceleration and deceleration rate in steps/sec²
    pub fn trapezoidal(total_steps: i64, max_velocity: f32, acceleration: f32) -> Self {
        let direction = Direction::from_steps(total_steps);
        let steps = u32::try_from(total_steps.unsigned_abs()).unwrap_or(u32::MAX);

        if steps == 0 || max_velocity <= 0.0 || acceleration <= 0.0 {
            return Self::zero();
        }

        // Distance to reach max velocity from rest: v² / 2a
        let ramp = max_velocity * max_velocity / (2.0 * acceleration);
        let ramp_steps = (ramp as u32).max(1);

        let (accel_steps, cruise_steps, decel_steps) = if 2 * ramp_steps as u64 >= steps as u64 {
            // Triangle profile: can't reach max velocity
            let accel_steps = steps / 2;
            (accel_steps, 0u32, steps - accel_steps)
        } else {
            (ramp_steps, steps - 2 * ramp_steps, ramp_steps)
        };

        Self {
            total_steps: steps,
            direction,
            accel_steps,
            cruise_steps,
            decel_steps,
            cruise_interval_ns: (1_000_000_000.0 / max_velocity) as u32,
            accel_rate: acceleration,
        }
    }

    /// Create a zero-length profile (no motion).
    pub fn zero() -> Self {
        Self {
            total_steps: 0,
            direction: Direction::Forward,
            accel_steps: 0,
            cruise_steps: 0,
            decel_steps: 0,
            cruise_interval_ns: u32::MAX,
            accel_rate: 0.0,
        }
    }

    /// Signed length of the move.
    #[inline]
    pub fn signed_steps(&self) -> i64 {
        self.direction.sign() * self.total_steps as i64
    }

    /// Get the phase at a given step number.
    pub fn phase_at(&self, step: u32) -> MotionPhase {
        if step >= self.total_steps {
            MotionPhase::Complete
        } else if step < self.accel_steps {
            MotionPhase::Accelerating
        } else if step < self.accel_steps + self.cruise_steps {
            MotionPhase::Cruising
        } else {
            MotionPhase::Decelerating
        }
    }

    /// Step interval before step number `step` (0-based).
    ///
    /// On the ramps the velocity after `n` steps from rest is `sqrt(2 a n)`.
    pub fn interval_at(&self, step: u32) -> u32 {
        let steps_from_rest = match self.phase_at(step) {
            MotionPhase::Complete => return u32::MAX,
            MotionPhase::Cruising => return self.cruise_interval_ns,
            MotionPhase::Accelerating => step + 1,
            MotionPhase::Decelerating => self.total_steps - step,
        };

        let velocity = sqrtf(2.0 * self.accel_rate * steps_from_rest as f32);
        let interval = (1_000_000_000.0 / velocity) as u32;
        interval.max(self.cruise_interval_ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trapezoidal_profile() {
        let profile = MotionProfile::trapezoidal(
            1000,   // steps
            1000.0, // steps/sec
            2000.0, // steps/sec²
        );

        assert_eq!(profile.total_steps, 1000);
        assert_eq!(profile.direction, Direction::Forward);
        // 1000² / (2 * 2000) = 250 steps per ramp
        assert_eq!(profile.accel_steps, 250);
        assert_eq!(profile.cruise_steps, 500);
        assert_eq!(profile.accel_steps, profile.decel_steps);
    }

    #[test]
    fn test_triangle_profile() {
        let profile = MotionProfile::trapezoidal(100, 10000.0, 1000.0);

        assert_eq!(profile.cruise_steps, 0);
        assert_eq!(profile.accel_steps + profile.decel_steps, 100);
    }

    #[test]
    fn test_single_step() {
        let profile = MotionProfile::trapezoidal(-1, 2000.0, 4000.0);

        assert_eq!(profile.total_steps, 1);
        assert_eq!(profile.direction, Direction::Backward);
        assert_eq!(profile.signed_steps(), -1);
        // pull-in rate sqrt(2 * 4000) ~ 89 steps/s
        let interval = profile.interval_at(0);
        assert!(interval > 11_000_000 && interval < 11_300_000, "{interval}");
    }

    #[test]
    fn test_intervals_shrink_then_grow() {
        let profile = MotionProfile::trapezoidal(1000, 1000.0, 2000.0);

        assert!(profile.interval_at(0) > profile.interval_at(100));
        assert_eq!(profile.interval_at(500), profile.cruise_interval_ns);
        assert!(profile.interval_at(999) > profile.interval_at(900));
        assert_eq!(profile.interval_at(1000), u32::MAX);
    }
}
