//! Builder pattern for PinStepper.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::{AxisConfig, MechanicalConstraints};
use crate::error::{ConfigError, Error, Result};

use super::driver::PinStepper;

/// Builder for creating [`PinStepper`] instances.
pub struct PinStepperBuilder<EN, STEP, DIR, DELAY>
where
    EN: OutputPin,
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    enable_pin: Option<EN>,
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    name: Option<heapless::String<32>>,
    constraints: Option<MechanicalConstraints>,
    invert_direction: bool,
    enable_active_low: bool,
}

impl<EN, STEP, DIR, DELAY> Default for PinStepperBuilder<EN, STEP, DIR, DELAY>
where
    EN: OutputPin,
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<EN, STEP, DIR, DELAY> PinStepperBuilder<EN, STEP, DIR, DELAY>
where
    EN: OutputPin,
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            enable_pin: None,
            step_pin: None,
            dir_pin: None,
            delay: None,
            name: None,
            constraints: None,
            invert_direction: false,
            enable_active_low: true,
        }
    }

    /// Set the enable pin.
    pub fn enable_pin(mut self, pin: EN) -> Self {
        self.enable_pin = Some(pin);
        self
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the motor name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = heapless::String::try_from(name).ok();
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set enable pin polarity.
    pub fn enable_active_low(mut self, active_low: bool) -> Self {
        self.enable_active_low = active_low;
        self
    }

    /// Configure from an AxisConfig.
    pub fn from_axis_config(mut self, config: &AxisConfig) -> Self {
        self.name = Some(config.name.clone());
        self.invert_direction = config.invert_direction;
        self.enable_active_low = config.enable_active_low;
        self.constraints = Some(MechanicalConstraints::from_config(config));
        self
    }

    /// Build the PinStepper.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin, the delay or the axis configuration is missing.
    pub fn build(self) -> Result<PinStepper<EN, STEP, DIR, DELAY>> {
        let enable_pin = self.enable_pin.ok_or_else(|| missing("enable_pin is required"))?;
        let step_pin = self.step_pin.ok_or_else(|| missing("step_pin is required"))?;
        let dir_pin = self.dir_pin.ok_or_else(|| missing("dir_pin is required"))?;
        let delay = self.delay.ok_or_else(|| missing("delay is required"))?;
        let constraints = self
            .constraints
            .ok_or_else(|| missing("axis configuration is required"))?;

        let name = self
            .name
            .unwrap_or_else(|| heapless::String::try_from("axis").unwrap_or_default());

        Ok(PinStepper::new(
            enable_pin,
            step_pin,
            dir_pin,
            delay,
            constraints,
            name,
            self.invert_direction,
            self.enable_active_low,
        ))
    }
}

fn missing(what: &str) -> Error {
    Error::Config(ConfigError::ParseError(
        heapless::String::try_from(what).unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;

    #[test]
    fn test_missing_pin_is_config_error() {
        let result = PinStepperBuilder::<PinMock, PinMock, PinMock, NoopDelay>::new()
            .delay(NoopDelay::new())
            .from_axis_config(&AxisConfig::hour_angle())
            .build();

        assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
    }

    #[test]
    fn test_name_from_config() {
        let (en, step, dir) = (PinMock::new(&[]), PinMock::new(&[]), PinMock::new(&[]));
        let (mut a, mut b, mut c) = (en.clone(), step.clone(), dir.clone());

        let stepper = PinStepperBuilder::new()
            .enable_pin(en)
            .step_pin(step)
            .dir_pin(dir)
            .delay(NoopDelay::new())
            .from_axis_config(&AxisConfig::declination())
            .build()
            .unwrap();

        assert_eq!(stepper.name(), "declination");
        assert_eq!(stepper.constraints().steps_per_revolution, 1_242_000);
        a.done();
        b.done();
        c.done();
    }
}
