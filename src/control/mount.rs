//! The controller object and its builder.

use chrono::{DateTime, NaiveDateTime, Utc};
use embedded_hal::delay::DelayNs;

use crate::cancel::{Cancellation, Outcome};
use crate::clock::Clock;
use crate::config::units::{Degrees, Steps};
use crate::config::{validate_config, AxisConfig, MountConfig};
use crate::ephemeris::{EphemerisSource, LowPrecisionSun, SolarEphemeris};
use crate::error::{ConfigError, Error, Result};
use crate::motor::{LimitSwitch, StepperAxis, StepperDriver};
use crate::pointing::PointingModel;

use super::schedule::ScheduleGate;
use super::status::{NullSink, StatusReport, StatusSink};
use super::AxisKind;

/// A two-axis solar mount.
///
/// Generic over:
/// - `D`: motor driver of both axes
/// - `L`: home switch of both axes
/// - `C`: wall clock
/// - `Y`: delay provider used for settling and sleeping
/// - `E`: solar ephemeris
/// - `S`: status sink
pub struct Mount<D, L, C, Y, E, S>
where
    D: StepperDriver,
    L: LimitSwitch,
    C: Clock,
    Y: DelayNs,
    E: EphemerisSource,
    S: StatusSink,
{
    pub(crate) config: MountConfig,
    pub(crate) gate: ScheduleGate,
    pub(crate) hour_angle: StepperAxis<D>,
    pub(crate) declination: StepperAxis<D>,
    pub(crate) hour_angle_switch: L,
    pub(crate) declination_switch: L,
    pub(crate) pointing: PointingModel,
    pub(crate) clock: C,
    pub(crate) delay: Y,
    pub(crate) ephemeris: E,
    pub(crate) sink: S,
    last_status: Option<DateTime<Utc>>,
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
    /// The configuration the mount was built from.
    #[inline]
    pub fn config(&self) -> &MountConfig {
        &self.config
    }

    /// Current belief about the antenna pointing.
    #[inline]
    pub fn pointing(&self) -> &PointingModel {
        &self.pointing
    }

    /// One of the two axes.
    #[inline]
    pub fn axis(&self, kind: AxisKind) -> &StepperAxis<D> {
        match kind {
            AxisKind::HourAngle => &self.hour_angle,
            AxisKind::Declination => &self.declination,
        }
    }

    /// The status sink.
    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the status sink.
    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The schedule gate built from the configuration.
    #[inline]
    pub fn gate(&self) -> &ScheduleGate {
        &self.gate
    }

    /// Current time according to the mount clock.
    #[inline]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Ephemeris for the configured site at `at`.
    pub fn ephemeris_at(&self, at: DateTime<Utc>) -> SolarEphemeris {
        self.ephemeris.compute(&self.config.site, at)
    }

    /// Station local time for a UTC instant.
    pub fn local_time(&self, at: DateTime<Utc>) -> NaiveDateTime {
        match self.config.schedule.offset() {
            Some(offset) => at.with_timezone(&offset).naive_local(),
            None => at.naive_utc(),
        }
    }

    /// Overwrite the model and the hour-angle step count, e.g. from a saved
    /// position. Homing replaces these values again.
    pub fn seed(&mut self, right_ascension: Degrees, declination: Degrees, hour_angle_steps: Steps) {
        let now = self.clock.now();
        self.pointing = PointingModel::new(now, right_ascension, declination);
        self.hour_angle.set_position(hour_angle_steps);
    }

    /// Release both motors.
    pub fn disable_all(&mut self) -> Result<()> {
        let hour_angle = self.hour_angle.disable();
        let declination = self.declination.disable();
        hour_angle.and(declination)
    }

    /// Bring the pointing model up to date and describe the current state.
    pub fn status_report(&mut self) -> StatusReport {
        let now = self.clock.now();
        self.pointing
            .advance_to(now, self.config.tracking.earth_rotation_rate);
        let eph = self.ephemeris_at(now);
        self.report_for(now, &eph)
    }

    /// Emit a status line now, regardless of the print interval.
    pub fn print_status(&mut self) -> StatusReport {
        let report = self.status_report();
        self.sink.report(&report);
        self.last_status = Some(report.timestamp);
        report
    }

    pub(crate) fn report_for(&self, now: DateTime<Utc>, eph: &SolarEphemeris) -> StatusReport {
        StatusReport {
            timestamp: now,
            sun_right_ascension: eph.sun_right_ascension,
            sun_declination: eph.sun_declination,
            sun_hour_angle: eph.sun_hour_angle(),
            antenna_right_ascension: self.pointing.right_ascension(),
            antenna_declination: self.pointing.declination(),
            antenna_hour_angle: self.pointing.hour_angle(eph.local_sidereal_time),
            hour_angle_steps: self.hour_angle.position_steps(),
            declination_steps: self.declination.position_steps(),
        }
    }

    /// Emit a status line unless one went out within the print interval.
    pub(crate) fn maybe_report(&mut self, now: DateTime<Utc>, eph: &SolarEphemeris) {
        let interval = i64::from(self.config.tracking.print_interval_ms);
        let due = match self.last_status {
            Some(last) => (now - last).num_milliseconds() >= interval,
            None => true,
        };
        if due {
            self.report_now(now, eph);
        }
    }

    /// Emit a status line for `now`.
    pub(crate) fn report_now(&mut self, now: DateTime<Utc>, eph: &SolarEphemeris) {
        let report = self.report_for(now, eph);
        self.sink.report(&report);
        self.last_status = Some(now);
    }

    pub(crate) fn axis_config(&self, kind: AxisKind) -> &AxisConfig {
        match kind {
            AxisKind::HourAngle => &self.config.axes.hour_angle,
            AxisKind::Declination => &self.config.axes.declination,
        }
    }

    pub(crate) fn axis_mut(&mut self, kind: AxisKind) -> &mut StepperAxis<D> {
        match kind {
            AxisKind::HourAngle => &mut self.hour_angle,
            AxisKind::Declination => &mut self.declination,
        }
    }

    /// Move an axis and carry the steps actually taken into the pointing model.
    ///
    /// Steps completed before a cancellation or a driver error still count.
    pub(crate) fn step_axis<K: Cancellation + ?Sized>(
        &mut self,
        kind: AxisKind,
        steps: i64,
        cancel: &K,
    ) -> Result<Outcome> {
        let degrees_per_step = self.axis_config(kind).degrees_per_step();
        let axis = self.axis_mut(kind);
        let before = axis.position_steps();
        let result = axis.move_relative(steps, cancel);
        let moved = axis.position_steps().0 - before.0;

        match kind {
            AxisKind::HourAngle => self.pointing.apply_ra_steps(moved, degrees_per_step),
            AxisKind::Declination => self.pointing.apply_dec_steps(moved, degrees_per_step),
        }
        result
    }

    /// Sleep for `ms` milliseconds in `cancel_poll_ms` slices.
    pub(crate) fn sleep_ms<K: Cancellation + ?Sized>(&mut self, ms: u64, cancel: &K) -> Outcome {
        let slice = u64::from(self.config.tracking.cancel_poll_ms.max(1));
        let mut remaining = ms;
        while remaining > 0 {
            if cancel.is_cancelled() {
                return Outcome::Cancelled;
            }
            let this_slice = remaining.min(slice);
            self.delay.delay_ms(this_slice as u32);
            remaining -= this_slice;
        }
        if cancel.is_cancelled() {
            Outcome::Cancelled
        } else {
            Outcome::Completed
        }
    }

    /// Pause after a single step.
    pub(crate) fn settle(&mut self) {
        let settle_us = self.config.tracking.step_settle_us;
        if settle_us > 0 {
            self.delay.delay_us(settle_us);
        }
    }
}

/// Builder for [`Mount`].
///
/// The ephemeris defaults to [`LowPrecisionSun`] and the status sink to
/// [`NullSink`]; both setters change the builder's type.
pub struct MountBuilder<D, L, C, Y, E = LowPrecisionSun, S = NullSink> {
    config: MountConfig,
    hour_angle: Option<(D, L)>,
    declination: Option<(D, L)>,
    clock: Option<C>,
    delay: Option<Y>,
    ephemeris: E,
    sink: S,
}

impl<D, L, C, Y> MountBuilder<D, L, C, Y>
where
    D: StepperDriver,
    L: LimitSwitch,
    C: Clock,
    Y: DelayNs,
{
    /// Start a builder from a configuration.
    pub fn new(config: MountConfig) -> Self {
        Self {
            config,
            hour_angle: None,
            declination: None,
            clock: None,
            delay: None,
            ephemeris: LowPrecisionSun,
            sink: NullSink,
        }
    }
}

impl<D, L, C, Y, E, S> MountBuilder<D, L, C, Y, E, S>
where
    D: StepperDriver,
    L: LimitSwitch,
    C: Clock,
    Y: DelayNs,
    E: EphemerisSource,
    S: StatusSink,
{
    /// Driver and home switch of the hour-angle axis.
    pub fn hour_angle(mut self, driver: D, switch: L) -> Self {
        self.hour_angle = Some((driver, switch));
        self
    }

    /// Driver and home switch of the declination axis.
    pub fn declination(mut self, driver: D, switch: L) -> Self {
        self.declination = Some((driver, switch));
        self
    }

    /// Set the clock.
    pub fn clock(mut self, clock: C) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: Y) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the ephemeris source.
    pub fn ephemeris<E2: EphemerisSource>(self, ephemeris: E2) -> MountBuilder<D, L, C, Y, E2, S> {
        MountBuilder {
            config: self.config,
            hour_angle: self.hour_angle,
            declination: self.declination,
            clock: self.clock,
            delay: self.delay,
            ephemeris,
            sink: self.sink,
        }
    }

    /// Replace the status sink.
    pub fn status_sink<S2: StatusSink>(self, sink: S2) -> MountBuilder<D, L, C, Y, E, S2> {
        MountBuilder {
            config: self.config,
            hour_angle: self.hour_angle,
            declination: self.declination,
            clock: self.clock,
            delay: self.delay,
            ephemeris: self.ephemeris,
            sink,
        }
    }

    /// Validate the configuration and build the mount.
    ///
    /// Both axes start at their configured startup position and the pointing
    /// model holds placeholder values until the first homing.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a collaborator is
    /// missing.
    pub fn build(self) -> Result<Mount<D, L, C, Y, E, S>> {
        validate_config(&self.config)?;

        let (ha_driver, ha_switch) = self.hour_angle.ok_or_else(|| missing("hour-angle axis is required"))?;
        let (dec_driver, dec_switch) =
            self.declination.ok_or_else(|| missing("declination axis is required"))?;
        let clock = self.clock.ok_or_else(|| missing("clock is required"))?;
        let delay = self.delay.ok_or_else(|| missing("delay is required"))?;

        let hour_angle = StepperAxis::new(ha_driver, &self.config.axes.hour_angle);
        let declination = StepperAxis::new(dec_driver, &self.config.axes.declination);
        let pointing = PointingModel::new(clock.now(), Degrees(0.0), Degrees(0.0));
        let gate = ScheduleGate::from_config(&self.config.schedule);

        log::info!(
            "mount ready at {:.4}N {:.4}E, axes at {} / {} steps",
            self.config.site.latitude,
            self.config.site.longitude,
            hour_angle.position_steps().0,
            declination.position_steps().0,
        );

        Ok(Mount {
            config: self.config,
            gate,
            hour_angle,
            declination,
            hour_angle_switch: ha_switch,
            declination_switch: dec_switch,
            pointing,
            clock,
            delay,
            ephemeris: self.ephemeris,
            sink: self.sink,
            last_status: None,
        })
    }
}

fn missing(what: &str) -> Error {
    Error::Config(ConfigError::ParseError(crate::error::truncated(what)))
}
