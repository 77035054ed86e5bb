//! # solar-mount
//!
//! Sun tracking for a two-axis equatorial antenna mount: an hour-angle axis
//! and a declination axis, each driven by a stepper motor with an optical
//! home switch.
//!
//! ## Features
//!
//! - **Configuration-driven**: Mechanics, site, tracking and schedule in one TOML file
//! - **embedded-hal 1.0**: `OutputPin` for STEP/DIR/EN, `InputPin` for home switches, `DelayNs` for timing
//! - **no_std compatible**: Control core works without the standard library
//! - **Pointing model**: Believed RA/Dec kept in step with the axes and earth rotation
//! - **Cancellable**: Every long-running operation yields to a [`Cancellation`] and releases its motors
//! - **Simulation**: Simulated axes, switches and clock for tests and demos (`std`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solar_mount::{load_config, MountBuilder, PinStepperBuilder, OpticalSwitch, SystemClock};
//!
//! let config = load_config("mount.toml")?;
//!
//! let hour_angle = PinStepperBuilder::new()
//!     .from_axis_config(&config.axes.hour_angle)
//!     .enable_pin(ha_en)
//!     .step_pin(ha_step)
//!     .dir_pin(ha_dir)
//!     .delay(ha_delay)
//!     .build()?;
//! let ha_switch = OpticalSwitch::from_axis_config(ha_home, &config.axes.hour_angle);
//! // ... same for the declination axis
//!
//! let mut mount = MountBuilder::new(config)
//!     .hour_angle(hour_angle, ha_switch)
//!     .declination(declination, dec_switch)
//!     .clock(SystemClock)
//!     .delay(delay)
//!     .build()?;
//!
//! mount.run_autonomous(&cancel)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): TOML loading, system clock, operator console,
//!   last-position file and simulated hardware
//! - `defmt`: `defmt::Format` on the small state enums

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod cancel;
pub mod clock;
pub mod config;
pub mod control;
pub mod ephemeris;
pub mod error;
pub mod motion;
pub mod motor;
pub mod pointing;

// Host-only modules
#[cfg(feature = "std")]
pub mod console;
#[cfg(feature = "std")]
pub mod persist;
#[cfg(feature = "std")]
pub mod sim;

// Re-exports for ergonomic API
pub use cancel::{Cancellation, NeverCancel, Outcome};
pub use clock::Clock;
pub use config::{validate_config, AxisConfig, MountConfig, ObserverLocation, ScheduleConfig, TrackingConfig};
pub use control::{
    AxisKind, DriveOptions, GateDecision, HomingPhase, HomingReport, Mount, MountBuilder, NullSink,
    ScheduleGate, StatusReport, StatusSink, Target,
};
pub use ephemeris::{EphemerisSource, FixedEphemeris, LowPrecisionSun, SolarEphemeris};
pub use error::{Error, Result};
pub use motion::Direction;
pub use motor::{LimitSwitch, LimitSwitchState, OpticalSwitch, PinStepper, PinStepperBuilder, StepperAxis, StepperDriver};
pub use pointing::PointingModel;

#[cfg(feature = "std")]
pub use cancel::CancelToken;
#[cfg(feature = "std")]
pub use clock::SystemClock;
#[cfg(feature = "std")]
pub use config::load_config;
#[cfg(feature = "std")]
pub use console::Console;
#[cfg(feature = "std")]
pub use control::WriterSink;
#[cfg(feature = "std")]
pub use persist::LastPosition;

// Unit types
pub use config::units::{Degrees, Steps, TimeOfDay};
