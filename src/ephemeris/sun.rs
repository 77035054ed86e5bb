//! Low-precision solar position.
//!
//! Uses the Astronomical Almanac approximation for the sun's ecliptic
//! longitude and the IAU 1982 mean sidereal time. Good to about 0.01 deg
//! between 1950 and 2050, far below what a solar radio antenna resolves.

use chrono::{DateTime, Utc};

use crate::config::units::{normalize, Degrees};
use crate::config::ObserverLocation;

use super::{EphemerisSource, SolarEphemeris};

/// Julian date of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian date of J2000.0.
const J2000_JD: f64 = 2_451_545.0;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Built-in solar ephemeris that needs no external service.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPrecisionSun;

impl LowPrecisionSun {
    /// Days since J2000.0.
    fn days_since_j2000(at: DateTime<Utc>) -> f64 {
        let jd = at.timestamp_millis() as f64 / MS_PER_DAY + UNIX_EPOCH_JD;
        jd - J2000_JD
    }

    /// Greenwich mean sidereal time in degrees.
    pub fn greenwich_sidereal_time(at: DateTime<Utc>) -> Degrees {
        let n = Self::days_since_j2000(at);
        Degrees(normalize(280.460_618_37 + 360.985_647_366_29 * n))
    }

    /// Sun right ascension and declination in degrees.
    pub fn equatorial(at: DateTime<Utc>) -> (Degrees, Degrees) {
        let n = Self::days_since_j2000(at);

        let mean_longitude = normalize(280.460 + 0.985_647_4 * n);
        let mean_anomaly = normalize(357.528 + 0.985_600_3 * n).to_radians();
        let ecliptic_longitude = (mean_longitude
            + 1.915 * libm::sin(mean_anomaly)
            + 0.020 * libm::sin(2.0 * mean_anomaly))
        .to_radians();
        let obliquity = (23.439 - 0.000_000_4 * n).to_radians();

        let ra = libm::atan2(
            libm::cos(obliquity) * libm::sin(ecliptic_longitude),
            libm::cos(ecliptic_longitude),
        );
        let dec = libm::asin(libm::sin(obliquity) * libm::sin(ecliptic_longitude));

        (
            Degrees(normalize(ra.to_degrees())),
            Degrees(dec.to_degrees()),
        )
    }
}

impl EphemerisSource for LowPrecisionSun {
    fn compute(&self, site: &ObserverLocation, at: DateTime<Utc>) -> SolarEphemeris {
        let (ra, dec) = Self::equatorial(at);
        let lst = normalize(Self::greenwich_sidereal_time(at).0 + site.longitude);

        let hour_angle = (lst - ra.0).to_radians();
        let latitude = site.latitude.to_radians();
        let declination = dec.0.to_radians();
        let altitude = libm::asin(
            libm::sin(latitude) * libm::sin(declination)
                + libm::cos(latitude) * libm::cos(declination) * libm::cos(hour_angle),
        );

        SolarEphemeris {
            sun_right_ascension: ra,
            sun_declination: dec,
            sun_altitude: Degrees(altitude.to_degrees()),
            local_sidereal_time: Degrees(lst),
        }
    }
}
