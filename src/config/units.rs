//! Unit types for physical quantities.
//!
//! Provides type-safe representations of angles, motor steps and times of
//! day so that circular sky angles, raw step counts and wall-clock values
//! cannot be mixed up.

use core::ops::{Add, Neg, Sub};

use chrono::NaiveTime;
use serde::Deserialize;

use crate::error::ConfigError;

/// Angle in degrees.
///
/// Right ascension and hour angle are circular and live in `[0, 360)` once
/// [`normalized`](Degrees::normalized); declination is a plain bounded value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    /// Create a new Degrees value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Wrap into `[0, 360)`.
    #[inline]
    pub fn normalized(self) -> Self {
        Self(normalize(self.0))
    }

    /// Signed shortest rotation from `self` to `target`, in `(-180, 180]`.
    ///
    /// Positive means the target lies ahead (increasing angle).
    #[inline]
    pub fn signed_delta_to(self, target: Degrees) -> Degrees {
        let forward = normalize(target.0 - self.0);
        if forward > 180.0 {
            Self(forward - 360.0)
        } else {
            Self(forward)
        }
    }

    /// Absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Self(libm::fabs(self.0))
    }
}

/// Wrap a raw angle into `[0, 360)`.
pub fn normalize(degrees: f64) -> f64 {
    let wrapped = libm::fmod(degrees, 360.0);
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    // fmod of a tiny negative value plus 360 can round up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

impl Add for Degrees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Degrees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Degrees {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// Motor position in steps (absolute from the hardware zero).
///
/// Uses i64 for unlimited range in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(transparent)]
pub struct Steps(pub i64);

impl Steps {
    /// Create a new Steps value.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Get absolute value as u64.
    #[inline]
    pub fn abs(self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Convert to degrees using the degrees-per-step ratio.
    #[inline]
    pub fn to_degrees(self, degrees_per_step: f64) -> Degrees {
        Degrees(self.0 as f64 * degrees_per_step)
    }
}

impl Add for Steps {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Steps {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Wall-clock time of day without a date, written `HH:MM` or `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay(pub NaiveTime);

impl TimeOfDay {
    /// Build from hour, minute and second.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Self)
    }

    /// Parse `HH:MM` or `HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTimeOfDay` for anything else.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let invalid = || {
            ConfigError::InvalidTimeOfDay(heapless::String::try_from(text).unwrap_or_default())
        };

        let mut fields = text.trim().split(':');
        let mut next = || -> Result<Option<u32>, ConfigError> {
            match fields.next() {
                Some(f) if !f.is_empty() && f.len() <= 2 => {
                    f.parse::<u32>().map(Some).map_err(|_| invalid())
                }
                Some(_) => Err(invalid()),
                None => Ok(None),
            }
        };

        let hour = next()?.ok_or_else(invalid)?;
        let minute = next()?.ok_or_else(invalid)?;
        let second = next()?.unwrap_or(0);
        if next()?.is_some() {
            return Err(invalid());
        }

        Self::from_hms(hour, minute, second).ok_or_else(invalid)
    }

    /// Seconds since midnight.
    pub fn seconds_from_midnight(self) -> u32 {
        use chrono::Timelike;
        self.0.num_seconds_from_midnight()
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let text = heapless::String::<16>::deserialize(deserializer)?;
        TimeOfDay::parse(text.as_str()).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_wraps_both_ways() {
        assert_eq!(normalize(360.0), 0.0);
        assert_eq!(normalize(-90.0), 270.0);
        assert!((normalize(725.5) - 5.5).abs() < 1e-9);
        assert!(normalize(-1e-18) < 360.0);
    }

    #[test]
    fn test_signed_delta_takes_short_way() {
        // 350 -> 10 is 20 degrees forward through 0
        let d = Degrees(350.0).signed_delta_to(Degrees(10.0));
        assert!((d.0 - 20.0).abs() < 1e-9);

        let d = Degrees(10.0).signed_delta_to(Degrees(350.0));
        assert!((d.0 + 20.0).abs() < 1e-9);

        let d = Degrees(45.005).signed_delta_to(Degrees(45.0));
        assert!((d.0 + 0.005).abs() < 1e-9);
    }

    #[test]
    fn test_steps_to_degrees() {
        let steps = Steps::new(3450);
        let degrees = steps.to_degrees(1.0 / 3450.0);
        assert!((degrees.value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_of_day_parsing() {
        assert_eq!(TimeOfDay::parse("07:30").unwrap(), TimeOfDay::from_hms(7, 30, 0).unwrap());
        assert_eq!(TimeOfDay::parse("18:05:09").unwrap(), TimeOfDay::from_hms(18, 5, 9).unwrap());
        assert!(TimeOfDay::parse("25:00").is_err());
        assert!(TimeOfDay::parse("7").is_err());
        assert!(TimeOfDay::parse("07:30:00:00").is_err());
        assert!(TimeOfDay::parse("ab:cd").is_err());
    }
}
