//! The unattended observation cycle.

use embedded_hal::delay::DelayNs;

use crate::cancel::{Cancellation, Outcome};
use crate::clock::Clock;
use crate::ephemeris::EphemerisSource;
use crate::error::Result;
use crate::motor::{LimitSwitch, StepperDriver};

use super::drive::{DriveOptions, Target};
use super::mount::Mount;
use super::status::StatusSink;

impl<D, L, C, Y, E, S> Mount<D, L, C, Y, E, S>
where
    D: StepperDriver,
    L: LimitSwitch,
    C: Clock,
    Y: DelayNs,
    E: EphemerisSource,
    S: StatusSink,
{
    /// Follow the sun day after day, assuming the mount has been homed.
    ///
    /// Each day: wait for the window (parking when due), wait for sunrise,
    /// slew to the sun, track it until the window closes, re-home. Only
    /// returns on cancellation or error.
    pub fn track_sun<K: Cancellation + ?Sized>(&mut self, cancel: &K) -> Result<Outcome> {
        loop {
            if self.wait_for_schedule(cancel)?.is_cancelled() {
                return Ok(Outcome::Cancelled);
            }
            if self.wait_for_sunrise(cancel)?.is_cancelled() {
                return Ok(Outcome::Cancelled);
            }

            log::info!("slewing to the sun");
            if self
                .drive_toward(Target::Sun, DriveOptions::goto(), cancel)?
                .is_cancelled()
            {
                return Ok(Outcome::Cancelled);
            }

            let until = self.window_close();
            log::info!("tracking until {}", until);
            if self
                .drive_toward(Target::Sun, DriveOptions::track_until(until), cancel)?
                .is_cancelled()
            {
                return Ok(Outcome::Cancelled);
            }

            log::info!("observation window closed, homing");
            if self.home_all(cancel)?.is_cancelled() {
                return Ok(Outcome::Cancelled);
            }
        }
    }

    /// Home both axes, then [`track_sun`](Self::track_sun).
    ///
    /// With `std`, a cancelled run writes the last position to the state
    /// file before returning.
    pub fn run_autonomous<K: Cancellation + ?Sized>(&mut self, cancel: &K) -> Result<Outcome> {
        self.disable_all()?;
        let outcome = match self.home_all(cancel)? {
            Outcome::Completed => self.track_sun(cancel)?,
            Outcome::Cancelled => Outcome::Cancelled,
        };

        if outcome.is_cancelled() {
            log::info!("autonomous run interrupted");
            #[cfg(feature = "std")]
            self.save_last_position()?;
        }
        Ok(outcome)
    }
}
