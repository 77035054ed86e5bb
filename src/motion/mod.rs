//! Motion module for solar-mount.
//!
//! Provides step direction selection, motion profile calculation and step
//! sequencing.

mod direction;
mod executor;
mod profile;

pub use direction::Direction;
pub use executor::MotionExecutor;
pub use profile::{MotionPhase, MotionProfile};
