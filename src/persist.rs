//! Last known position, kept across restarts.
//!
//! The file holds three whitespace-separated numbers: right ascension,
//! declination and the absolute step count of the hour-angle axis. There is
//! no version field.

use core::fmt;
use std::fs;
use std::path::Path;

use embedded_hal::delay::DelayNs;

use crate::clock::Clock;
use crate::config::units::{Degrees, Steps};
use crate::control::{Mount, StatusSink};
use crate::ephemeris::EphemerisSource;
use crate::error::{truncated, PersistError, Result};
use crate::motor::{LimitSwitch, StepperDriver};

/// Pointing and hour-angle step count at shutdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastPosition {
    /// Believed right ascension.
    pub right_ascension: Degrees,
    /// Believed declination.
    pub declination: Degrees,
    /// Absolute step count of the hour-angle axis.
    pub hour_angle_steps: Steps,
}

impl LastPosition {
    /// Write to `path`, replacing any previous content.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), self.to_string())
            .map_err(|e| PersistError::Io(truncated(&e.to_string())))?;
        log::info!("last position saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Read from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())
            .map_err(|e| PersistError::Io(truncated(&e.to_string())))?;
        Self::parse(&text)
    }

    /// Parse the three-field text form.
    pub fn parse(text: &str) -> Result<Self> {
        let mut fields = text.split_whitespace();
        let ra = next_field(&mut fields, "right ascension")?;
        let dec = next_field(&mut fields, "declination")?;
        let steps = next_field(&mut fields, "hour-angle steps")?;
        if fields.next().is_some() {
            return Err(PersistError::Format(truncated("trailing fields")).into());
        }

        let bad = |what: &str| PersistError::Format(truncated(&format!("bad {}", what)));
        let right_ascension: f64 = ra.parse().map_err(|_| bad("right ascension"))?;
        let declination: f64 = dec.parse().map_err(|_| bad("declination"))?;
        // older files may carry the step count as a float
        let hour_angle_steps = match steps.parse::<i64>() {
            Ok(v) => v,
            Err(_) => steps
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.round() as i64)
                .ok_or_else(|| bad("hour-angle steps"))?,
        };

        if !right_ascension.is_finite() || !declination.is_finite() {
            return Err(bad("angle").into());
        }

        Ok(Self {
            right_ascension: Degrees(right_ascension).normalized(),
            declination: Degrees(declination),
            hour_angle_steps: Steps(hour_angle_steps),
        })
    }
}

fn next_field<'a>(
    fields: &mut core::str::SplitWhitespace<'a>,
    name: &str,
) -> core::result::Result<&'a str, PersistError> {
    fields
        .next()
        .ok_or_else(|| PersistError::Format(truncated(&format!("missing {}", name))))
}

impl fmt::Display for LastPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.right_ascension.0, self.declination.0, self.hour_angle_steps.0
        )
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
    /// Snapshot of the pointing brought up to date for earth rotation.
    pub fn last_position(&mut self) -> LastPosition {
        let report = self.status_report();
        LastPosition {
            right_ascension: report.antenna_right_ascension,
            declination: report.antenna_declination,
            hour_angle_steps: report.hour_angle_steps,
        }
    }

    /// Seed the pointing model and hour-angle steps from a saved position.
    pub fn restore(&mut self, position: &LastPosition) {
        log::info!(
            "restoring RA {:.4}, Dec {:.4}, {} steps",
            position.right_ascension.0,
            position.declination.0,
            position.hour_angle_steps.0
        );
        self.seed(
            position.right_ascension,
            position.declination,
            position.hour_angle_steps,
        );
    }

    /// Save [`last_position`](Self::last_position) to the configured state file.
    pub fn save_last_position(&mut self) -> Result<LastPosition> {
        let position = self.last_position();
        position.save(self.config.state_file.as_str())?;
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_reference_format() {
        let pos = LastPosition::parse("123.456 -45.0 172500").unwrap();
        assert_eq!(pos.right_ascension, Degrees(123.456));
        assert_eq!(pos.declination, Degrees(-45.0));
        assert_eq!(pos.hour_angle_steps, Steps(172_500));
    }

    #[test]
    fn test_parse_float_steps() {
        let pos = LastPosition::parse("10 0 621000.0\n").unwrap();
        assert_eq!(pos.hour_angle_steps, Steps(621_000));
    }

    #[test]
    fn test_parse_rejects_short_and_garbage() {
        assert!(matches!(
            LastPosition::parse("1.0 2.0"),
            Err(Error::Persist(PersistError::Format(_)))
        ));
        assert!(matches!(
            LastPosition::parse("a b c"),
            Err(Error::Persist(PersistError::Format(_)))
        ));
        assert!(LastPosition::parse("1 2 3 4").is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("solar-mount-lastpos-{}.txt", std::process::id()));
        let pos = LastPosition {
            right_ascension: Degrees(359.5),
            declination: Degrees(12.25),
            hour_angle_steps: Steps(-1234),
        };

        pos.save(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "359.5 12.25 -1234");
        assert_eq!(LastPosition::load(&path).unwrap(), pos);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = LastPosition::load("/nonexistent/solar-mount/lastPos.txt");
        assert!(matches!(result, Err(Error::Persist(PersistError::Io(_)))));
    }
}
