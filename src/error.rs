//! Error types for solar-mount.
//!
//! Provides unified error handling across configuration, motor control,
//! pointing, homing and persisted state. Cancellation is not an error: it is
//! reported through [`Outcome`](crate::Outcome).

use core::fmt;

use crate::control::AxisKind;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all solar-mount operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor driver or GPIO error
    Motor(MotorError),
    /// Pointing or target error
    Motion(MotionError),
    /// Homing procedure error
    Homing(HomingError),
    /// Last-position file error (std only)
    #[cfg(feature = "std")]
    Persist(PersistError),
    /// Operator console could not be read or written (std only)
    #[cfg(feature = "std")]
    Console(heapless::String<128>),
    /// The interrupt handler could not be installed (std only)
    #[cfg(feature = "std")]
    Signal(heapless::String<128>),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid transmission ratio (must be > 0)
    InvalidStepsPerDegree(f64),
    /// Invalid max speed (must be > 0)
    InvalidMaxSpeed(f32),
    /// Invalid max acceleration (must be > 0)
    InvalidMaxAcceleration(f32),
    /// Chunk or seek bound of zero steps
    InvalidStepBound(&'static str),
    /// Dead-band must cover at least one step and stay below half a turn
    InvalidDeadband {
        /// Configured dead-band in degrees
        deadband: f64,
        /// Angle of one step in degrees
        step: f64,
    },
    /// Invalid soft limits (min must be < max)
    InvalidSoftLimits {
        /// Minimum limit value
        min: f64,
        /// Maximum limit value
        max: f64,
    },
    /// Observer latitude or longitude out of range
    InvalidSite {
        /// Latitude in degrees
        latitude: f64,
        /// Longitude in degrees
        longitude: f64,
    },
    /// Time of day could not be parsed
    InvalidTimeOfDay(heapless::String<16>),
    /// Observation window must start before it stops
    InvalidWindow,
    /// UTC offset outside +-24h
    InvalidUtcOffset(i32),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor driver errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
    /// Driver reported a fault
    Driver(heapless::String<64>),
}

/// Pointing and target errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Operator supplied a value outside its valid domain
    InvalidTarget {
        /// Rejected value
        value: f64,
        /// Smallest accepted value
        min: f64,
        /// Largest accepted value
        max: f64,
    },
    /// A one-shot goto did not converge within its step budget
    StepBudgetExceeded {
        /// Steps issued before giving up
        steps: u64,
    },
    /// A goto to the sun while it is below the minimum altitude
    SunBelowHorizon {
        /// Sun altitude in degrees
        altitude: f64,
    },
    /// A schedule or sunrise wait outlasted `max_wait_secs`
    WaitTimeout {
        /// Seconds spent waiting
        secs: u64,
    },
}

/// Homing errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HomingError {
    /// The limit switch never triggered within the seek bound
    Stall {
        /// Axis that was seeking
        axis: AxisKind,
        /// Steps taken while seeking
        steps: u64,
    },
}

/// Errors reading or writing the last-position file.
#[cfg(feature = "std")]
#[derive(Debug, Clone, PartialEq)]
pub enum PersistError {
    /// File could not be read or written
    Io(heapless::String<128>),
    /// File content is not three whitespace-separated numbers
    Format(heapless::String<64>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
            Error::Homing(e) => write!(f, "Homing error: {}", e),
            #[cfg(feature = "std")]
            Error::Persist(e) => write!(f, "State file error: {}", e),
            #[cfg(feature = "std")]
            Error::Console(msg) => write!(f, "Console I/O error: {}", msg),
            #[cfg(feature = "std")]
            Error::Signal(msg) => write!(f, "Interrupt handler error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidStepsPerDegree(v) => {
                write!(f, "Invalid steps per degree: {}. Must be > 0", v)
            }
            ConfigError::InvalidMaxSpeed(v) => write!(f, "Invalid max speed: {}. Must be > 0", v),
            ConfigError::InvalidMaxAcceleration(v) => {
                write!(f, "Invalid max acceleration: {}. Must be > 0", v)
            }
            ConfigError::InvalidStepBound(field) => write!(f, "{} must be at least 1 step", field),
            ConfigError::InvalidDeadband { deadband, step } => write!(
                f,
                "Invalid dead-band {}: must be >= one step ({}) and < 180",
                deadband, step
            ),
            ConfigError::InvalidSoftLimits { min, max } => {
                write!(f, "Invalid soft limits: min ({}) must be < max ({})", min, max)
            }
            ConfigError::InvalidSite { latitude, longitude } => write!(
                f,
                "Invalid site: latitude {} must be in [-90, 90], longitude {} in [-180, 180]",
                latitude, longitude
            ),
            ConfigError::InvalidTimeOfDay(s) => {
                write!(f, "Invalid time of day '{}'. Expected HH:MM or HH:MM:SS", s)
            }
            ConfigError::InvalidWindow => write!(f, "Observation window must start before it stops"),
            ConfigError::InvalidUtcOffset(m) => {
                write!(f, "Invalid UTC offset: {} minutes", m)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::Driver(msg) => write!(f, "Driver fault: {}", msg),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidTarget { value, min, max } => {
                write!(f, "Target {} outside [{}, {}]", value, min, max)
            }
            MotionError::StepBudgetExceeded { steps } => {
                write!(f, "Target not reached after {} steps", steps)
            }
            MotionError::SunBelowHorizon { altitude } => {
                write!(f, "Sun is below the horizon limit ({:.2} deg)", altitude)
            }
            MotionError::WaitTimeout { secs } => {
                write!(f, "Gave up waiting after {} s", secs)
            }
        }
    }
}

impl fmt::Display for HomingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomingError::Stall { axis, steps } => write!(
                f,
                "{} axis did not reach its limit switch after {} steps",
                axis.label(),
                steps
            ),
        }
    }
}

#[cfg(feature = "std")]
impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(msg) => write!(f, "I/O error: {}", msg),
            PersistError::Format(msg) => write!(f, "Malformed content: {}", msg),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

impl From<HomingError> for Error {
    fn from(e: HomingError) -> Self {
        Error::Homing(e)
    }
}

#[cfg(feature = "std")]
impl From<PersistError> for Error {
    fn from(e: PersistError) -> Self {
        Error::Persist(e)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Console(truncated(&e.to_string()))
    }
}

/// Copy `message` into a fixed-capacity string, dropping what does not fit.
pub(crate) fn truncated<const N: usize>(message: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in message.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

#[cfg(feature = "std")]
impl std::error::Error for HomingError {}

#[cfg(feature = "std")]
impl std::error::Error for PersistError {}
