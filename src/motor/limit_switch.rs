//! Home-position limit switches.

use embedded_hal::digital::InputPin;

use crate::config::AxisConfig;
use crate::error::{MotorError, Result};

/// State of a limit switch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LimitSwitchState {
    /// The axis sits at its home reference.
    AtLimit,
    /// The axis can still move toward the switch.
    NotAtLimit,
}

/// Abstraction for a polled limit switch.
pub trait LimitSwitch {
    /// Read the current state.
    fn state(&mut self) -> Result<LimitSwitchState>;

    /// `true` when the switch reads [`LimitSwitchState::AtLimit`].
    fn is_triggered(&mut self) -> Result<bool> {
        Ok(self.state()? == LimitSwitchState::AtLimit)
    }
}

/// Optical endstop wired to a GPIO input.
pub struct OpticalSwitch<P: InputPin> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> OpticalSwitch<P> {
    /// Wrap an input pin. With `active_low` the beam-break reads low at the limit.
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }

    /// Wrap an input pin with the polarity from `switch_active_low`.
    pub fn from_axis_config(pin: P, config: &AxisConfig) -> Self {
        Self::new(pin, config.switch_active_low)
    }
}

impl<P: InputPin> LimitSwitch for OpticalSwitch<P> {
    fn state(&mut self) -> Result<LimitSwitchState> {
        let low = self.pin.is_low().map_err(|_| MotorError::PinError)?;
        Ok(if low == self.active_low {
            LimitSwitchState::AtLimit
        } else {
            LimitSwitchState::NotAtLimit
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};

    #[test]
    fn test_active_low_switch() {
        let pin = PinMock::new(&[
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
        ]);
        let mut probe = pin.clone();
        let mut switch = OpticalSwitch::new(pin, true);

        assert_eq!(switch.state().unwrap(), LimitSwitchState::NotAtLimit);
        assert!(switch.is_triggered().unwrap());
        probe.done();
    }

    #[test]
    fn test_polarity_from_axis_config() {
        let mut config = AxisConfig::declination();
        config.switch_active_low = false;
        let pin = PinMock::new(&[
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::High),
        ]);
        let mut probe = pin.clone();
        let mut switch = OpticalSwitch::from_axis_config(pin, &config);

        assert!(!switch.is_triggered().unwrap());
        assert!(switch.is_triggered().unwrap());
        probe.done();
    }

    #[test]
    fn test_active_high_switch() {
        let pin = PinMock::new(&[PinTransaction::get(PinState::High)]);
        let mut probe = pin.clone();
        let mut switch = OpticalSwitch::new(pin, false);

        assert!(switch.is_triggered().unwrap());
        probe.done();
    }
}
