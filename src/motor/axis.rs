//! One motorized axis: a driver plus its absolute step position.

use crate::cancel::{Cancellation, Outcome};
use crate::config::units::{Degrees, Steps};
use crate::config::AxisConfig;
use crate::error::Result;

use super::driver::StepperDriver;
use super::position::Position;

/// A stepper driver with position bookkeeping.
///
/// Moves are split into chunks of at most `chunk_steps`. The position is
/// updated after every chunk the driver acknowledged, and cancellation is
/// polled between chunks. The driver is enabled for the duration of a move
/// and disabled afterwards, whatever the move's outcome.
pub struct StepperAxis<D: StepperDriver> {
    driver: D,
    position: Position,
    chunk_steps: u32,
    enabled: bool,
}

impl<D: StepperDriver> StepperAxis<D> {
    /// Wrap a driver. The axis starts at the configured startup position.
    pub fn new(driver: D, config: &AxisConfig) -> Self {
        Self {
            driver,
            position: Position::at(config.startup_position(), config.degrees_per_step()),
            chunk_steps: config.chunk_steps.max(1),
            enabled: false,
        }
    }

    /// Absolute position in steps.
    #[inline]
    pub fn position_steps(&self) -> Steps {
        self.position.steps()
    }

    /// Absolute position as an angle from the hardware zero.
    #[inline]
    pub fn position_degrees(&self) -> Degrees {
        self.position.degrees()
    }

    /// Overwrite the absolute position without moving.
    #[inline]
    pub fn set_position(&mut self, steps: Steps) {
        self.position.set_steps(steps);
    }

    /// Whether the driver is currently energized by this axis.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Borrow the underlying driver.
    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Move by `steps` relative steps.
    ///
    /// A zero move and a move whose cancellation was already requested do not
    /// touch the driver.
    pub fn move_relative<C: Cancellation + ?Sized>(
        &mut self,
        steps: i64,
        cancel: &C,
    ) -> Result<Outcome> {
        if steps == 0 {
            return Ok(Outcome::Completed);
        }
        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        if let Err(e) = self.driver.set_enabled(true) {
            let _ = self.disable();
            return Err(e);
        }
        self.enabled = true;

        let moved = self.run_chunks(steps, cancel);
        let released = self.disable();

        let outcome = moved?;
        released?;
        Ok(outcome)
    }

    /// Release the motor coils.
    pub fn disable(&mut self) -> Result<()> {
        self.driver.set_enabled(false)?;
        self.enabled = false;
        Ok(())
    }

    fn run_chunks<C: Cancellation + ?Sized>(&mut self, steps: i64, cancel: &C) -> Result<Outcome> {
        let chunk = i64::from(self.chunk_steps);
        let mut remaining = steps;

        while remaining != 0 {
            let this_chunk = remaining.clamp(-chunk, chunk);
            self.driver.move_relative(this_chunk)?;
            self.position.move_steps(this_chunk);
            remaining -= this_chunk;

            if remaining != 0 && cancel.is_cancelled() {
                log::debug!("move cancelled with {} steps remaining", remaining);
                return Ok(Outcome::Cancelled);
            }
        }

        Ok(Outcome::Completed)
    }
}

impl<D: StepperDriver> Drop for StepperAxis<D> {
    fn drop(&mut self) {
        if self.enabled {
            let _ = self.driver.set_enabled(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::NeverCancel;
    use crate::error::{Error, MotorError};
    use core::cell::Cell;
    use core::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct Recorder {
        calls: heapless::Vec<i64, 16>,
        enabled: bool,
        enables: u32,
        fail_move: bool,
    }

    impl StepperDriver for Recorder {
        fn set_enabled(&mut self, enabled: bool) -> Result<()> {
            if enabled {
                self.enables += 1;
            }
            self.enabled = enabled;
            Ok(())
        }

        fn move_relative(&mut self, steps: i64) -> Result<()> {
            if self.fail_move {
                return Err(Error::Motor(MotorError::PinError));
            }
            let _ = self.calls.push(steps);
            Ok(())
        }
    }

    fn small_chunks() -> AxisConfig {
        let mut config = AxisConfig::hour_angle();
        config.chunk_steps = 100;
        config
    }

    #[test]
    fn test_zero_move_is_noop() {
        let mut axis = StepperAxis::new(Recorder::default(), &small_chunks());
        assert_eq!(axis.move_relative(0, &NeverCancel).unwrap(), Outcome::Completed);
        assert_eq!(axis.driver().enables, 0);
        assert_eq!(axis.position_steps(), Steps(621_000));
    }

    #[test]
    fn test_move_is_chunked_and_released() {
        let mut axis = StepperAxis::new(Recorder::default(), &small_chunks());
        assert_eq!(axis.move_relative(-250, &NeverCancel).unwrap(), Outcome::Completed);

        assert_eq!(axis.driver().calls.as_slice(), &[-100, -100, -50]);
        assert_eq!(axis.position_steps(), Steps(620_750));
        assert!(!axis.driver().enabled);
        assert!(!axis.is_enabled());
    }

    #[test]
    fn test_cancel_between_chunks() {
        struct AfterChunks<'a> {
            polls: Cell<u32>,
            limit: u32,
            flag: &'a AtomicBool,
        }
        impl Cancellation for AfterChunks<'_> {
            fn is_cancelled(&self) -> bool {
                self.polls.set(self.polls.get() + 1);
                if self.polls.get() > self.limit {
                    self.flag.store(true, Ordering::Release);
                }
                self.flag.load(Ordering::Acquire)
            }
        }

        let flag = AtomicBool::new(false);
        // first poll is the pre-move check, then one poll per chunk
        let cancel = AfterChunks { polls: Cell::new(0), limit: 2, flag: &flag };
        let mut axis = StepperAxis::new(Recorder::default(), &small_chunks());

        assert_eq!(axis.move_relative(1000, &cancel).unwrap(), Outcome::Cancelled);
        assert_eq!(axis.driver().calls.len(), 2);
        assert_eq!(axis.position_steps(), Steps(621_200));
        assert!(!axis.driver().enabled);
    }

    #[test]
    fn test_cancelled_before_start() {
        let flag = AtomicBool::new(true);
        let mut axis = StepperAxis::new(Recorder::default(), &small_chunks());
        assert_eq!(axis.move_relative(10, &flag).unwrap(), Outcome::Cancelled);
        assert_eq!(axis.driver().enables, 0);
    }

    #[test]
    fn test_driver_error_still_disables() {
        let driver = Recorder { fail_move: true, ..Recorder::default() };
        let mut axis = StepperAxis::new(driver, &small_chunks());

        assert!(axis.move_relative(10, &NeverCancel).is_err());
        assert!(!axis.driver().enabled);
        assert_eq!(axis.position_steps(), Steps(621_000));
    }
}
