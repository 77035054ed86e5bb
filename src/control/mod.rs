//! The mount controller.
//!
//! [`Mount`] owns both axes, the pointing model and every collaborator. All
//! motion goes through its operations:
//!
//! - [`Mount::drive_toward`] and [`Mount::jog`] move toward a target or by a
//!   raw step count,
//! - [`Mount::home`] re-anchors an axis at its limit switch,
//! - [`Mount::wait_for_schedule`], [`Mount::park`] and
//!   [`Mount::wait_for_sunrise`] gate the observation day,
//! - [`Mount::run_autonomous`] strings them together for unattended use.
//!
//! Every long-running operation takes a [`Cancellation`](crate::Cancellation)
//! and returns an [`Outcome`](crate::Outcome); motors are released on every
//! exit path.

mod drive;
mod homing;
mod mount;
mod schedule;
mod status;
mod tracking;

pub use drive::{DriveOptions, Target};
pub use homing::{HomingPhase, HomingReport};
pub use mount::{Mount, MountBuilder};
pub use schedule::{GateDecision, ScheduleGate};
pub use status::{NullSink, StatusReport, StatusSink};

#[cfg(feature = "std")]
pub use status::WriterSink;

/// One of the two motorized axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisKind {
    /// Hour-angle (right ascension) axis.
    HourAngle,
    /// Declination axis.
    Declination,
}

impl AxisKind {
    /// Short lowercase name for log lines.
    pub fn label(self) -> &'static str {
        match self {
            AxisKind::HourAngle => "hour-angle",
            AxisKind::Declination => "declination",
        }
    }
}
