//! Stepper motor drivers.
//!
//! [`StepperDriver`] is the seam between the mount logic and the hardware:
//! it only knows how to energize the coils and how to issue a relative
//! number of steps. [`PinStepper`] implements it on top of embedded-hal 1.0
//! pins for STEP/DIR drivers with an enable input.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::MechanicalConstraints;
use crate::error::{MotorError, Result};
use crate::motion::{Direction, MotionExecutor, MotionProfile};

/// STEP pulse width in nanoseconds.
const PULSE_WIDTH_NS: u32 = 2_000;

/// A motor that can be enabled and moved by a relative number of steps.
///
/// A call to [`move_relative`](StepperDriver::move_relative) blocks until the
/// steps have been issued. Positive steps turn the axis forward.
pub trait StepperDriver {
    /// Energize (`true`) or release (`false`) the motor coils.
    fn set_enabled(&mut self, enabled: bool) -> Result<()>;

    /// Issue `steps` steps; the sign selects the direction.
    fn move_relative(&mut self, steps: i64) -> Result<()>;
}

impl<T: StepperDriver + ?Sized> StepperDriver for &mut T {
    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        (**self).set_enabled(enabled)
    }

    fn move_relative(&mut self, steps: i64) -> Result<()> {
        (**self).move_relative(steps)
    }
}

/// STEP/DIR/EN stepper driver.
///
/// Generic over:
/// - `EN`: enable pin type (must implement `OutputPin`)
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider (must implement `DelayNs`)
pub struct PinStepper<EN, STEP, DIR, DELAY>
where
    EN: OutputPin,
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Enable pin.
    enable_pin: EN,

    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = forward, unless inverted).
    dir_pin: DIR,

    /// Delay provider for step timing.
    delay: DELAY,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// Mechanical constraints from configuration.
    constraints: MechanicalConstraints,

    /// Motor name for logging/debugging.
    name: heapless::String<32>,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Whether the driver is enabled by a low level.
    enable_active_low: bool,

    /// Last commanded coil state.
    enabled: bool,
}

impl<EN, STEP, DIR, DELAY> PinStepper<EN, STEP, DIR, DELAY>
where
    EN: OutputPin,
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        enable_pin: EN,
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
        constraints: MechanicalConstraints,
        name: heapless::String<32>,
        invert_direction: bool,
        enable_active_low: bool,
    ) -> Self {
        Self {
            enable_pin,
            step_pin,
            dir_pin,
            delay,
            current_direction: None,
            constraints,
            name,
            invert_direction,
            enable_active_low,
            enabled: false,
        }
    }

    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get the mechanical constraints.
    #[inline]
    pub fn constraints(&self) -> &MechanicalConstraints {
        &self.constraints
    }

    /// Last commanded coil state.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Forward => !self.invert_direction,
            Direction::Backward => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }

    fn pulse(&mut self) -> Result<()> {
        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_ns(PULSE_WIDTH_NS);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        Ok(())
    }
}

impl<EN, STEP, DIR, DELAY> StepperDriver for PinStepper<EN, STEP, DIR, DELAY>
where
    EN: OutputPin,
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        if enabled != self.enable_active_low {
            self.enable_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.enable_pin.set_low().map_err(|_| MotorError::PinError)?;
        }
        self.enabled = enabled;
        Ok(())
    }

    fn move_relative(&mut self, steps: i64) -> Result<()> {
        if steps == 0 {
            return Ok(());
        }

        let profile = MotionProfile::trapezoidal(
            steps,
            self.constraints.max_velocity_steps_per_sec,
            self.constraints.max_acceleration_steps_per_sec2,
        );
        self.set_direction(profile.direction)?;

        for interval_ns in MotionExecutor::new(profile) {
            self.pulse()?;
            // keep the step rate even across back-to-back calls
            self.delay.delay_ns(interval_ns.saturating_sub(PULSE_WIDTH_NS));
        }

        Ok(())
    }
}
