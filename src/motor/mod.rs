//! Motor drivers, axes and home switches.

mod axis;
mod builder;
mod driver;
mod limit_switch;
mod position;

pub use axis::StepperAxis;
pub use builder::PinStepperBuilder;
pub use driver::{PinStepper, StepperDriver};
pub use limit_switch::{LimitSwitch, LimitSwitchState, OpticalSwitch};
pub use position::Position;
