//! Configuration module for solar-mount.
//!
//! Provides types for loading and validating the mount, site, tracking and
//! schedule configuration from TOML files (with `std` feature) or pre-built
//! values.

mod axis;
mod limits;
mod mechanical;
mod schedule;
mod site;
mod system;
mod tracking;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::AxisConfig;
pub use limits::{LimitPolicy, SoftLimits};
pub use mechanical::MechanicalConstraints;
pub use schedule::ScheduleConfig;
pub use site::ObserverLocation;
pub use system::{AxesConfig, MountConfig};
pub use tracking::TrackingConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, Steps, TimeOfDay};
