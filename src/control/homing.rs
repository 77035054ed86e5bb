//! Homing: seek the limit switch, then re-anchor steps and pointing.

use embedded_hal::delay::DelayNs;

use crate::cancel::{Cancellation, Outcome};
use crate::clock::Clock;
use crate::config::units::Steps;
use crate::ephemeris::EphemerisSource;
use crate::error::{HomingError, Result};
use crate::motor::{LimitSwitch, StepperDriver};

use super::mount::Mount;
use super::status::StatusSink;
use super::AxisKind;

/// Progress of a homing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingPhase {
    /// Stepping toward the switch.
    Seeking,
    /// The switch reads triggered; the motor is stopped.
    Reached,
    /// Step count and pointing have been overwritten with the home values.
    Anchored,
}

/// Result of [`Mount::home`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomingReport {
    /// Homed axis.
    pub axis: AxisKind,
    /// Last phase reached.
    pub phase: HomingPhase,
    /// Whether the run completed or was cancelled while seeking.
    pub outcome: Outcome,
    /// Steps taken while seeking.
    pub seek_steps: u64,
    /// Absolute step count when the run ended.
    pub position: Steps,
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
    /// Home one axis.
    ///
    /// Single-steps toward the switch until it triggers, then sets the
    /// absolute position to `home_position_steps` and anchors the pointing
    /// model: right ascension becomes `LST - home_angle` on the hour-angle
    /// axis, declination becomes `home_angle` on the declination axis.
    ///
    /// Homing an axis whose switch already reads triggered takes no steps.
    ///
    /// # Errors
    ///
    /// [`HomingError::Stall`] when the switch has not triggered after
    /// `max_seek_steps`; driver and switch errors are propagated. The motor
    /// is released in every case.
    pub fn home<K: Cancellation + ?Sized>(&mut self, axis: AxisKind, cancel: &K) -> Result<HomingReport> {
        let config = self.axis_config(axis);
        let step = config.seek_direction.sign();
        let max_seek_steps = config.max_seek_steps;
        let home_position = config.home_position;
        let home_angle = config.home_angle;

        log::info!("homing {} axis", axis.label());

        let mut seek_steps: u64 = 0;
        loop {
            if cancel.is_cancelled() {
                log::info!("homing {} cancelled after {} steps", axis.label(), seek_steps);
                return Ok(HomingReport {
                    axis,
                    phase: HomingPhase::Seeking,
                    outcome: Outcome::Cancelled,
                    seek_steps,
                    position: self.axis(axis).position_steps(),
                });
            }

            let switch = match axis {
                AxisKind::HourAngle => &mut self.hour_angle_switch,
                AxisKind::Declination => &mut self.declination_switch,
            };
            if switch.is_triggered()? {
                break;
            }

            if seek_steps >= max_seek_steps {
                log::warn!("{} axis stalled after {} seek steps", axis.label(), seek_steps);
                self.axis_mut(axis).disable()?;
                return Err(HomingError::Stall {
                    axis,
                    steps: seek_steps,
                }
                .into());
            }

            if self.axis_mut(axis).move_relative(step, cancel)?.is_cancelled() {
                continue;
            }
            seek_steps += 1;
            self.settle();
        }

        log::debug!("{} axis {:?} after {} steps", axis.label(), HomingPhase::Reached, seek_steps);

        let now = self.clock.now();
        let eph = self.ephemeris_at(now);
        self.pointing
            .advance_to(now, self.config.tracking.earth_rotation_rate);
        self.axis_mut(axis).set_position(home_position);
        match axis {
            AxisKind::HourAngle => {
                self.pointing
                    .anchor_right_ascension(eph.local_sidereal_time, home_angle, now)
            }
            AxisKind::Declination => self.pointing.anchor_declination(home_angle, now),
        }

        log::info!(
            "{} axis homed: {} steps, RA {:.4}, Dec {:.4}",
            axis.label(),
            home_position.0,
            self.pointing.right_ascension().0,
            self.pointing.declination().0,
        );
        self.report_now(now, &eph);

        Ok(HomingReport {
            axis,
            phase: HomingPhase::Anchored,
            outcome: Outcome::Completed,
            seek_steps,
            position: home_position,
        })
    }

    /// Home the hour-angle axis, then the declination axis.
    pub fn home_all<K: Cancellation + ?Sized>(&mut self, cancel: &K) -> Result<Outcome> {
        for axis in [AxisKind::HourAngle, AxisKind::Declination] {
            if self.home(axis, cancel)?.outcome.is_cancelled() {
                return Ok(Outcome::Cancelled);
            }
        }
        Ok(Outcome::Completed)
    }
}
