//! Solar ephemeris sources.
//!
//! The mount only needs four numbers from the sky: the sun's right
//! ascension, declination and altitude, and the local sidereal time at the
//! observer. Anything able to produce them can implement [`EphemerisSource`].

mod sun;

use chrono::{DateTime, Utc};

use crate::config::units::{normalize, Degrees};
use crate::config::ObserverLocation;

pub use sun::LowPrecisionSun;

/// Sun position and sidereal time for one instant, all in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarEphemeris {
    /// Apparent right ascension of the sun, in `[0, 360)`.
    pub sun_right_ascension: Degrees,
    /// Declination of the sun.
    pub sun_declination: Degrees,
    /// Altitude of the sun above the horizon.
    pub sun_altitude: Degrees,
    /// Local sidereal time, in `[0, 360)`.
    pub local_sidereal_time: Degrees,
}

impl SolarEphemeris {
    /// Hour angle of the sun: `normalize(LST - RA)`.
    pub fn sun_hour_angle(&self) -> Degrees {
        Degrees(normalize(
            self.local_sidereal_time.0 - self.sun_right_ascension.0,
        ))
    }

    /// Whether the sun is above `min_altitude`.
    pub fn sun_is_up(&self, min_altitude: f64) -> bool {
        self.sun_altitude.0 > min_altitude
    }
}

/// Computes [`SolarEphemeris`] values. Must be deterministic for a given input.
pub trait EphemerisSource {
    /// Ephemeris for `site` at `at`.
    fn compute(&self, site: &ObserverLocation, at: DateTime<Utc>) -> SolarEphemeris;
}

impl<E: EphemerisSource + ?Sized> EphemerisSource for &E {
    fn compute(&self, site: &ObserverLocation, at: DateTime<Utc>) -> SolarEphemeris {
        (**self).compute(site, at)
    }
}

/// Returns the same values at every instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedEphemeris(pub SolarEphemeris);

impl FixedEphemeris {
    /// Sun at `right_ascension`/`declination`, `altitude` above the horizon,
    /// with sidereal time `lst`.
    pub fn new(right_ascension: f64, declination: f64, altitude: f64, lst: f64) -> Self {
        Self(SolarEphemeris {
            sun_right_ascension: Degrees(normalize(right_ascension)),
            sun_declination: Degrees(declination),
            sun_altitude: Degrees(altitude),
            local_sidereal_time: Degrees(normalize(lst)),
        })
    }
}

impl EphemerisSource for FixedEphemeris {
    fn compute(&self, _site: &ObserverLocation, _at: DateTime<Utc>) -> SolarEphemeris {
        self.0
    }
}
