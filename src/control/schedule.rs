//! Daily observation schedule: track, park or wait.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use embedded_hal::delay::DelayNs;

use crate::cancel::{Cancellation, Outcome};
use crate::clock::Clock;
use crate::config::units::{Steps, TimeOfDay};
use crate::config::ScheduleConfig;
use crate::ephemeris::EphemerisSource;
use crate::error::{MotionError, Result};
use crate::motor::{LimitSwitch, StepperDriver};

use super::mount::Mount;
use super::status::StatusSink;
use super::AxisKind;

const SECONDS_PER_DAY: i64 = 86_400;

/// What the mount should be doing at a given time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateDecision {
    /// Inside the observation window (including the lead time).
    Track,
    /// Close to the park time.
    Park,
    /// Anything else.
    Wait,
}

/// Pure time-of-day decision function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleGate {
    start: TimeOfDay,
    stop: TimeOfDay,
    park: TimeOfDay,
    lead_secs: i64,
    park_window_secs: i64,
}

impl ScheduleGate {
    /// Gate for a configured schedule.
    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self {
            start: config.start,
            stop: config.stop,
            park: config.park,
            lead_secs: i64::from(config.lead_minutes) * 60,
            park_window_secs: i64::from(config.park_window_minutes) * 60,
        }
    }

    /// Decide for a local time of day.
    ///
    /// The window `[start - lead, stop]` wins over the park window. The park
    /// window is measured around the clock, so a park time near midnight
    /// also matches times on the other side of it.
    pub fn decide(&self, local: NaiveTime) -> GateDecision {
        let now = i64::from(TimeOfDay(local).seconds_from_midnight());
        let opens = i64::from(self.start.seconds_from_midnight()) - self.lead_secs;
        let closes = i64::from(self.stop.seconds_from_midnight());

        if now >= opens && now <= closes {
            return GateDecision::Track;
        }

        let apart = (now - i64::from(self.park.seconds_from_midnight())).abs();
        if apart.min(SECONDS_PER_DAY - apart) <= self.park_window_secs {
            GateDecision::Park
        } else {
            GateDecision::Wait
        }
    }

    /// End of the observation window.
    #[inline]
    pub fn stop(&self) -> TimeOfDay {
        self.stop
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
    /// Block until the gate says [`GateDecision::Track`].
    ///
    /// Polls every `poll_interval_secs`. A [`GateDecision::Park`] parks the
    /// antenna, dwells, re-homes and then consults the gate again.
    ///
    /// # Errors
    ///
    /// [`MotionError::WaitTimeout`] once the wait outlasts `max_wait_secs`.
    pub fn wait_for_schedule<K: Cancellation + ?Sized>(&mut self, cancel: &K) -> Result<Outcome> {
        log::info!("waiting for the next scheduled event");
        let started = self.clock.now();
        loop {
            if cancel.is_cancelled() {
                return Ok(Outcome::Cancelled);
            }

            let now = self.clock.now();
            let decision = self.gate.decide(self.local_time(now).time());
            log::trace!("schedule gate at {}: {:?}", now, decision);

            match decision {
                GateDecision::Track => {
                    log::info!("observation window open");
                    return Ok(Outcome::Completed);
                }
                GateDecision::Park => {
                    if self.park(cancel)?.is_cancelled() {
                        return Ok(Outcome::Cancelled);
                    }
                }
                GateDecision::Wait => {
                    self.check_wait_bound(started, now)?;
                    let poll_ms = u64::from(self.config.schedule.poll_interval_secs) * 1000;
                    if self.sleep_ms(poll_ms, cancel).is_cancelled() {
                        return Ok(Outcome::Cancelled);
                    }
                }
            }
        }
    }

    /// Park the hour-angle axis a quarter turn from home, dwell, re-home.
    pub fn park<K: Cancellation + ?Sized>(&mut self, cancel: &K) -> Result<Outcome> {
        let axis = &self.config.axes.hour_angle;
        let offset = libm::round(self.config.schedule.park_offset * axis.steps_per_degree) as i64;
        let target = Steps(axis.home_position.0 - offset);
        let delta = target.0 - self.hour_angle.position_steps().0;

        log::info!("parking: moving hour-angle axis to {} steps", target.0);
        self.pointing
            .advance_to(self.clock.now(), self.config.tracking.earth_rotation_rate);
        if self.step_axis(AxisKind::HourAngle, delta, cancel)?.is_cancelled() {
            log::info!("park cancelled");
            return Ok(Outcome::Cancelled);
        }
        self.print_status();

        let dwell_ms = u64::from(self.config.schedule.park_dwell_secs) * 1000;
        log::info!("parked, dwelling {} s", self.config.schedule.park_dwell_secs);
        if self.sleep_ms(dwell_ms, cancel).is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        log::info!("leaving park, going back home");
        Ok(self.home(AxisKind::HourAngle, cancel)?.outcome)
    }

    /// Block until the sun is above `min_sun_altitude_deg`.
    ///
    /// # Errors
    ///
    /// [`MotionError::WaitTimeout`] once the wait outlasts `max_wait_secs`.
    pub fn wait_for_sunrise<K: Cancellation + ?Sized>(&mut self, cancel: &K) -> Result<Outcome> {
        let min_altitude = self.config.tracking.min_sun_altitude;
        let started = self.clock.now();
        let mut announced = false;
        loop {
            if cancel.is_cancelled() {
                return Ok(Outcome::Cancelled);
            }
            let now = self.clock.now();
            let eph = self.ephemeris_at(now);
            if eph.sun_is_up(min_altitude) {
                log::info!("sun is up at {:.2} deg", eph.sun_altitude.0);
                return Ok(Outcome::Completed);
            }
            if !announced {
                log::info!("waiting for sunrise");
                announced = true;
            }
            self.check_wait_bound(started, now)?;
            let poll_ms = u64::from(self.config.tracking.sunrise_poll_ms);
            if self.sleep_ms(poll_ms, cancel).is_cancelled() {
                return Ok(Outcome::Cancelled);
            }
        }
    }

    fn check_wait_bound(&self, started: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
        let waited = (now - started).num_seconds().max(0) as u64;
        if waited >= u64::from(self.config.schedule.max_wait_secs) {
            log::warn!("wait abandoned after {} s", waited);
            return Err(MotionError::WaitTimeout { secs: waited }.into());
        }
        Ok(())
    }

    /// UTC instant at which today's observation window closes.
    pub fn window_close(&self) -> DateTime<Utc> {
        let now = self.clock.now();
        let local_stop = self.local_time(now).date().and_time(self.gate.stop().0);
        let offset = Duration::minutes(i64::from(self.config.schedule.utc_offset_minutes));
        Utc.from_utc_datetime(&(local_stop - offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_window_includes_lead_time() {
        let gate = ScheduleGate::from_config(&ScheduleConfig::default());

        assert_eq!(gate.decide(at(5, 59)), GateDecision::Wait);
        assert_eq!(gate.decide(at(6, 0)), GateDecision::Track);
        assert_eq!(gate.decide(at(12, 0)), GateDecision::Track);
        assert_eq!(gate.decide(at(17, 0)), GateDecision::Track);
        assert_eq!(gate.decide(at(17, 1)), GateDecision::Wait);
    }

    #[test]
    fn test_park_window() {
        let gate = ScheduleGate::from_config(&ScheduleConfig::default());

        assert_eq!(gate.decide(at(21, 44)), GateDecision::Wait);
        assert_eq!(gate.decide(at(21, 45)), GateDecision::Park);
        assert_eq!(gate.decide(at(22, 15)), GateDecision::Park);
        assert_eq!(gate.decide(at(22, 16)), GateDecision::Wait);
    }

    #[test]
    fn test_park_window_across_midnight() {
        let mut config = ScheduleConfig::default();
        config.park = TimeOfDay::from_hms(23, 55, 0).unwrap();
        let gate = ScheduleGate::from_config(&config);

        assert_eq!(gate.decide(at(0, 5)), GateDecision::Park);
        assert_eq!(gate.decide(at(0, 11)), GateDecision::Wait);
    }

    #[test]
    fn test_window_wins_over_park() {
        let mut config = ScheduleConfig::default();
        config.park = TimeOfDay::from_hms(16, 55, 0).unwrap();
        let gate = ScheduleGate::from_config(&config);

        assert_eq!(gate.decide(at(16, 55)), GateDecision::Track);
        assert_eq!(gate.decide(at(17, 5)), GateDecision::Park);
    }
}
