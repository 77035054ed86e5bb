//! The pointing model.
//!
//! The model is the controller's belief about the antenna's right ascension
//! and declination. It is only loosely tied to the step counters: steps move
//! it by a fixed angle each, earth rotation drifts it, and homing re-anchors
//! it to the sky.

use chrono::{DateTime, Utc};

use crate::config::units::{normalize, Degrees};

/// Believed antenna pointing with the instant it was last brought up to date.
///
/// Right ascension is kept in `[0, 360)` after every mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointingModel {
    timestamp: DateTime<Utc>,
    right_ascension: Degrees,
    declination: Degrees,
}

impl PointingModel {
    /// Model with explicit values, e.g. a placeholder before homing.
    pub fn new(timestamp: DateTime<Utc>, right_ascension: Degrees, declination: Degrees) -> Self {
        Self {
            timestamp,
            right_ascension: right_ascension.normalized(),
            declination,
        }
    }

    /// Instant of the last update.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Believed right ascension, in `[0, 360)`.
    #[inline]
    pub fn right_ascension(&self) -> Degrees {
        self.right_ascension
    }

    /// Believed declination.
    #[inline]
    pub fn declination(&self) -> Degrees {
        self.declination
    }

    /// Hour angle of the pointing at sidereal time `lst`.
    pub fn hour_angle(&self, lst: Degrees) -> Degrees {
        Degrees(normalize(lst.0 - self.right_ascension.0))
    }

    /// Account for earth rotation since the last update.
    ///
    /// A parked antenna keeps its hour angle, so its right ascension grows at
    /// `rate` degrees per second. A clock that stepped backwards adds nothing.
    pub fn advance_to(&mut self, now: DateTime<Utc>, rate: f64) {
        let elapsed_ms = (now - self.timestamp).num_milliseconds().max(0);
        let elapsed = elapsed_ms as f64 / 1000.0;
        self.right_ascension = Degrees(normalize(self.right_ascension.0 + elapsed * rate));
        self.timestamp = now;
    }

    /// Move the right ascension by `steps` steps of `degrees_per_step` each.
    pub fn apply_ra_steps(&mut self, steps: i64, degrees_per_step: f64) {
        self.right_ascension = Degrees(normalize(
            self.right_ascension.0 + steps as f64 * degrees_per_step,
        ));
    }

    /// Move the declination by `steps` steps of `degrees_per_step` each.
    pub fn apply_dec_steps(&mut self, steps: i64, degrees_per_step: f64) {
        self.declination = Degrees(self.declination.0 + steps as f64 * degrees_per_step);
    }

    /// Anchor the right ascension to a known hour angle: `RA = LST - HA`.
    pub fn anchor_right_ascension(&mut self, lst: Degrees, home_hour_angle: Degrees, now: DateTime<Utc>) {
        self.right_ascension = Degrees(normalize(lst.0 - home_hour_angle.0));
        self.timestamp = now;
    }

    /// Anchor the declination to a known value.
    pub fn anchor_declination(&mut self, declination: Degrees, now: DateTime<Utc>) {
        self.declination = declination;
        self.timestamp = now;
    }
}
