//! Goto, tracking and manual moves.

use chrono::{DateTime, Utc};
use embedded_hal::delay::DelayNs;

use crate::cancel::{Cancellation, Outcome};
use crate::clock::Clock;
use crate::config::units::Degrees;
use crate::ephemeris::EphemerisSource;
use crate::error::{MotionError, Result};
use crate::motion::Direction;
use crate::motor::{LimitSwitch, StepperDriver};

use super::mount::Mount;
use super::status::StatusSink;
use super::AxisKind;

/// Where to point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Fixed equatorial coordinates. Without a declination only the
    /// hour-angle axis moves.
    Fixed {
        /// Target right ascension.
        right_ascension: Degrees,
        /// Optional target declination.
        declination: Option<Degrees>,
    },
    /// The sun's right ascension, re-read from the ephemeris every iteration.
    Sun,
}

impl Target {
    /// Right ascension only.
    pub fn right_ascension(degrees: f64) -> Self {
        Target::Fixed {
            right_ascension: Degrees(degrees),
            declination: None,
        }
    }

    /// Right ascension and declination.
    pub fn equatorial(right_ascension: f64, declination: f64) -> Self {
        Target::Fixed {
            right_ascension: Degrees(right_ascension),
            declination: Some(Degrees(declination)),
        }
    }
}

/// How [`Mount::drive_toward`] ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriveOptions {
    /// Keep following the target instead of returning once inside the
    /// dead-band.
    pub continuous: bool,
    /// Return once the clock passes this instant.
    pub until: Option<DateTime<Utc>>,
}

impl DriveOptions {
    /// One-shot goto.
    pub fn goto() -> Self {
        Self::default()
    }

    /// Follow the target until cancelled.
    pub fn track() -> Self {
        Self {
            continuous: true,
            until: None,
        }
    }

    /// Follow the target until `until`.
    pub fn track_until(until: DateTime<Utc>) -> Self {
        Self {
            continuous: true,
            until: Some(until),
        }
    }
}

impl<D, L, C, Y, E, S> Mount<D, L, C, Y, E, S>
where
    D: StepperDriver,
    L: LimitSwitch,
    C: Clock,
    Y: DelayNs,
    E: EphemerisSource,
    S: StatusSink,
{
    /// Drive toward a target one step at a time.
    ///
    /// Each iteration brings the pointing model up to date for earth
    /// rotation, computes the circular error to the target and, when it is
    /// large enough, issues one step through the shorter arc. A one-shot
    /// goto returns once both errors are inside the dead-band; continuous
    /// tracking holds within one step and only ends on cancellation or when
    /// `options.until` passes. While tracking the sun below the minimum
    /// altitude no steps are issued.
    ///
    /// # Errors
    ///
    /// [`MotionError::InvalidTarget`] for a declination outside the soft
    /// limits (with the reject policy) or a non-finite right ascension;
    /// [`MotionError::StepBudgetExceeded`] when a goto has not converged
    /// after `max_goto_steps`; [`MotionError::SunBelowHorizon`] for a goto to
    /// the sun while it is below `min_sun_altitude_deg`.
    pub fn drive_toward<K: Cancellation + ?Sized>(
        &mut self,
        target: Target,
        options: DriveOptions,
        cancel: &K,
    ) -> Result<Outcome> {
        let declination_target = match target {
            Target::Fixed {
                right_ascension,
                declination,
            } => {
                if !right_ascension.0.is_finite() {
                    return Err(MotionError::InvalidTarget {
                        value: right_ascension.0,
                        min: 0.0,
                        max: 360.0,
                    }
                    .into());
                }
                declination.map(|dec| self.bounded_declination(dec)).transpose()?
            }
            Target::Sun => None,
        };

        let tracking = &self.config.tracking;
        let rate = tracking.earth_rotation_rate;
        let min_altitude = tracking.min_sun_altitude;
        let max_steps = tracking.max_goto_steps;
        let idle_ms = u64::from(tracking.idle_interval_ms);
        let (ra_tolerance, dec_tolerance) = if options.continuous {
            (
                self.config.axes.hour_angle.degrees_per_step(),
                self.config.axes.declination.degrees_per_step(),
            )
        } else {
            (tracking.deadband, tracking.deadband)
        };

        let mut iterations: u64 = 0;
        loop {
            if cancel.is_cancelled() {
                log::info!("drive cancelled after {} steps", iterations);
                return Ok(Outcome::Cancelled);
            }

            let now = self.clock.now();
            if options.until.is_some_and(|until| now >= until) {
                log::info!("tracking ended at {}", now);
                return Ok(Outcome::Completed);
            }

            let eph = self.ephemeris_at(now);
            self.pointing.advance_to(now, rate);

            let target_ra = match target {
                Target::Fixed {
                    right_ascension, ..
                } => right_ascension.normalized(),
                Target::Sun => eph.sun_right_ascension,
            };
            let ra_error = self.pointing.right_ascension().signed_delta_to(target_ra);
            let dec_error = declination_target.map(|dec| dec.0 - self.pointing.declination().0);

            let hold = matches!(target, Target::Sun) && !eph.sun_is_up(min_altitude);
            if hold && !options.continuous {
                log::warn!("sun at {:.2} deg is below the horizon limit", eph.sun_altitude.0);
                return Err(MotionError::SunBelowHorizon {
                    altitude: eph.sun_altitude.0,
                }
                .into());
            }

            let ra_pending = ra_error.abs().0 >= ra_tolerance;
            let dec_pending = dec_error.is_some_and(|e| libm::fabs(e) >= dec_tolerance);

            if !options.continuous && !ra_pending && !dec_pending {
                self.report_now(now, &eph);
                log::debug!(
                    "target reached: RA {:.4}, Dec {:.4}",
                    self.pointing.right_ascension().0,
                    self.pointing.declination().0
                );
                return Ok(Outcome::Completed);
            }

            if !options.continuous && iterations >= max_steps {
                log::warn!("goto gave up after {} steps, error {:.4}", iterations, ra_error.0);
                return Err(MotionError::StepBudgetExceeded { steps: iterations }.into());
            }

            let mut stepped = false;
            if !hold {
                if ra_pending {
                    let direction =
                        Direction::shortest_arc(self.pointing.right_ascension(), target_ra);
                    if self
                        .step_axis(AxisKind::HourAngle, direction.sign(), cancel)?
                        .is_cancelled()
                    {
                        return Ok(Outcome::Cancelled);
                    }
                    stepped = true;
                }
                if let (true, Some(error)) = (dec_pending, dec_error) {
                    let direction = if error > 0.0 {
                        Direction::Forward
                    } else {
                        Direction::Backward
                    };
                    if self
                        .step_axis(AxisKind::Declination, direction.sign(), cancel)?
                        .is_cancelled()
                    {
                        return Ok(Outcome::Cancelled);
                    }
                    stepped = true;
                }
            }

            self.maybe_report(now, &eph);

            if stepped {
                iterations += 1;
                self.settle();
            } else if self.sleep_ms(idle_ms, cancel).is_cancelled() {
                return Ok(Outcome::Cancelled);
            }
        }
    }

    /// Move both axes by raw step counts.
    ///
    /// The pointing model follows the steps actually taken, so the model
    /// stays consistent with the axes without re-homing.
    ///
    /// # Errors
    ///
    /// [`MotionError::InvalidTarget`] when either count exceeds
    /// `max_manual_steps`; nothing moves in that case.
    pub fn jog<K: Cancellation + ?Sized>(
        &mut self,
        ra_steps: i64,
        dec_steps: i64,
        cancel: &K,
    ) -> Result<Outcome> {
        let max = self.config.tracking.max_manual_steps;
        for steps in [ra_steps, dec_steps] {
            if steps.unsigned_abs() > max {
                return Err(MotionError::InvalidTarget {
                    value: steps as f64,
                    min: -(max as f64),
                    max: max as f64,
                }
                .into());
            }
        }

        log::info!(
            "manual move: {} hour-angle steps, {} declination steps",
            ra_steps,
            dec_steps
        );
        self.pointing
            .advance_to(self.clock.now(), self.config.tracking.earth_rotation_rate);

        if self
            .step_axis(AxisKind::HourAngle, ra_steps, cancel)?
            .is_cancelled()
        {
            return Ok(Outcome::Cancelled);
        }
        if self
            .step_axis(AxisKind::Declination, dec_steps, cancel)?
            .is_cancelled()
        {
            return Ok(Outcome::Cancelled);
        }

        self.print_status();
        Ok(Outcome::Completed)
    }

    /// Apply the declination soft limits to a target.
    pub fn bounded_declination(&self, declination: Degrees) -> Result<Degrees> {
        match &self.config.axes.declination.limits {
            Some(limits) => limits.apply(declination).ok_or_else(|| {
                MotionError::InvalidTarget {
                    value: declination.0,
                    min: limits.min.0,
                    max: limits.max.0,
                }
                .into()
            }),
            None if declination.0.is_finite() => Ok(declination),
            None => Err(MotionError::InvalidTarget {
                value: declination.0,
                min: -90.0,
                max: 90.0,
            }
            .into()),
        }
    }
}
