//! Observer location.

use serde::Deserialize;

/// Geographic position of the station.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ObserverLocation {
    /// Geodetic latitude in degrees, north positive.
    #[serde(rename = "latitude_deg")]
    pub latitude: f64,

    /// Longitude in degrees, east positive.
    #[serde(rename = "longitude_deg")]
    pub longitude: f64,

    /// Height above sea level in meters.
    #[serde(default, rename = "elevation_m")]
    pub elevation: f64,
}

impl ObserverLocation {
    /// Create a new location.
    pub const fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }

    /// Check latitude and longitude ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl Default for ObserverLocation {
    /// Višnjan, Istria.
    fn default() -> Self {
        Self::new(45.2756, 13.7208, 230.0)
    }
}
