//! Simulated hardware.
//!
//! A [`SimulatedAxis`] stands in for a motor, its driver and its optical
//! home switch. The driver, switch and probe handles share one state, so a
//! test can hand the driver and switch to a [`Mount`] and keep the probe to
//! look at what the hardware did. [`SimClock`] and [`SimDelay`] share
//! simulated time: every delay advances the clock, so hours of tracking run
//! in milliseconds.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use embedded_hal::delay::DelayNs;

use crate::cancel::Cancellation;
use crate::clock::Clock;
use crate::config::units::Steps;
use crate::config::MountConfig;
use crate::control::{Mount, MountBuilder, NullSink, StatusSink};
use crate::ephemeris::{EphemerisSource, LowPrecisionSun};
use crate::error::{truncated, MotorError, Result};
use crate::motion::Direction;
use crate::motor::{LimitSwitch, LimitSwitchState, StepperDriver};

/// A mount running on simulated hardware.
pub type SimMount<E = LowPrecisionSun, S = NullSink> =
    Mount<SimDriver, SimSwitch, SimClock, SimDelay, E, S>;

#[derive(Debug)]
struct AxisState {
    position: i64,
    enabled: bool,
    switch_at: Option<i64>,
    seek: Direction,
    moves: u64,
    steps_moved: u64,
    enables: u64,
    fail_after_moves: Option<u64>,
}

/// Shared state of one simulated axis.
#[derive(Debug, Clone)]
pub struct SimulatedAxis {
    state: Rc<RefCell<AxisState>>,
}

impl SimulatedAxis {
    /// Axis at physical step `position` whose switch triggers once the axis
    /// reaches `switch_at` moving in `seek` direction.
    pub fn new(position: i64, switch_at: i64, seek: Direction) -> Self {
        Self::with_switch(position, Some(switch_at), seek)
    }

    /// Axis whose switch never triggers.
    pub fn without_switch(position: i64) -> Self {
        Self::with_switch(position, None, Direction::Forward)
    }

    fn with_switch(position: i64, switch_at: Option<i64>, seek: Direction) -> Self {
        Self {
            state: Rc::new(RefCell::new(AxisState {
                position,
                enabled: false,
                switch_at,
                seek,
                moves: 0,
                steps_moved: 0,
                enables: 0,
                fail_after_moves: None,
            })),
        }
    }

    /// Make the driver fail every move after the first `moves`.
    pub fn fail_after(self, moves: u64) -> Self {
        self.state.borrow_mut().fail_after_moves = Some(moves);
        self
    }

    /// Driver handle.
    pub fn driver(&self) -> SimDriver {
        SimDriver {
            state: Rc::clone(&self.state),
        }
    }

    /// Home switch handle.
    pub fn switch(&self) -> SimSwitch {
        SimSwitch {
            state: Rc::clone(&self.state),
        }
    }

    /// Inspection handle.
    pub fn probe(&self) -> SimProbe {
        SimProbe {
            state: Rc::clone(&self.state),
        }
    }
}

/// Simulated motor driver.
#[derive(Debug)]
pub struct SimDriver {
    state: Rc<RefCell<AxisState>>,
}

impl StepperDriver for SimDriver {
    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if enabled {
            state.enables += 1;
        }
        state.enabled = enabled;
        Ok(())
    }

    fn move_relative(&mut self, steps: i64) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_after_moves.is_some_and(|n| state.moves >= n) {
            return Err(MotorError::Driver(truncated("injected fault")).into());
        }
        if !state.enabled {
            return Err(MotorError::Driver(truncated("move while disabled")).into());
        }
        state.position += steps;
        state.moves += 1;
        state.steps_moved += steps.unsigned_abs();
        Ok(())
    }
}

/// Simulated optical home switch.
#[derive(Debug)]
pub struct SimSwitch {
    state: Rc<RefCell<AxisState>>,
}

impl LimitSwitch for SimSwitch {
    fn state(&mut self) -> Result<LimitSwitchState> {
        let state = self.state.borrow();
        let triggered = match (state.switch_at, state.seek) {
            (None, _) => false,
            (Some(at), Direction::Forward) => state.position >= at,
            (Some(at), Direction::Backward) => state.position <= at,
        };
        Ok(if triggered {
            LimitSwitchState::AtLimit
        } else {
            LimitSwitchState::NotAtLimit
        })
    }
}

/// Read-only view of a simulated axis, plus a physical nudge.
#[derive(Debug, Clone)]
pub struct SimProbe {
    state: Rc<RefCell<AxisState>>,
}

impl SimProbe {
    /// Physical position in steps.
    pub fn position(&self) -> Steps {
        Steps(self.state.borrow().position)
    }

    /// Whether the driver output is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    /// Driver moves issued so far.
    pub fn moves(&self) -> u64 {
        self.state.borrow().moves
    }

    /// Total steps moved in either direction.
    pub fn steps_moved(&self) -> u64 {
        self.state.borrow().steps_moved
    }

    /// How many times the driver was enabled.
    pub fn enables(&self) -> u64 {
        self.state.borrow().enables
    }

    /// Move the axis by hand, without the driver.
    pub fn push(&self, steps: i64) {
        self.state.borrow_mut().position += steps;
    }
}

/// Simulated wall clock.
#[derive(Debug, Clone)]
pub struct SimClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl SimClock {
    /// Clock reading `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an instant.
    pub fn set(&self, at: DateTime<Utc>) {
        self.now.set(at);
    }

    /// A delay provider advancing this clock.
    pub fn delay(&self) -> SimDelay {
        SimDelay { clock: self.clone() }
    }
}

impl Clock for SimClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Delay provider that advances a [`SimClock`] instead of sleeping.
#[derive(Debug, Clone)]
pub struct SimDelay {
    clock: SimClock,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance(Duration::nanoseconds(i64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.advance(Duration::microseconds(i64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance(Duration::milliseconds(i64::from(ms)));
    }
}

/// Requests cancellation from the `limit + 1`-th poll on.
///
/// Sweeping `limit` injects a cancellation at every yield point of an
/// operation in turn.
#[derive(Debug, Default)]
pub struct CancelAfter {
    polls: Cell<u64>,
    limit: u64,
}

impl CancelAfter {
    /// Let `limit` polls pass.
    pub fn new(limit: u64) -> Self {
        Self {
            polls: Cell::new(0),
            limit,
        }
    }

    /// Polls seen so far.
    pub fn polls(&self) -> u64 {
        self.polls.get()
    }
}

impl Cancellation for CancelAfter {
    fn is_cancelled(&self) -> bool {
        let polls = self.polls.get() + 1;
        self.polls.set(polls);
        polls > self.limit
    }
}

/// Requests cancellation once a simulated clock reaches an instant.
#[derive(Debug, Clone)]
pub struct CancelAt {
    clock: SimClock,
    at: DateTime<Utc>,
}

impl CancelAt {
    /// Cancel from `at` on.
    pub fn new(clock: &SimClock, at: DateTime<Utc>) -> Self {
        Self {
            clock: clock.clone(),
            at,
        }
    }
}

impl Cancellation for CancelAt {
    fn is_cancelled(&self) -> bool {
        self.clock.now() >= self.at
    }
}

/// Handles kept by the test or demo after building a [`SimMount`].
#[derive(Debug, Clone)]
pub struct SimRig {
    /// Shared simulated time.
    pub clock: SimClock,
    /// Hour-angle axis hardware.
    pub hour_angle: SimProbe,
    /// Declination axis hardware.
    pub declination: SimProbe,
}

impl SimRig {
    /// Build a mount on simulated hardware.
    ///
    /// Each axis starts `seek_distance` steps short of its home switch, which
    /// sits at the configured home position.
    pub fn mount<E: EphemerisSource, S: StatusSink>(
        config: MountConfig,
        start: DateTime<Utc>,
        seek_distance: i64,
        ephemeris: E,
        sink: S,
    ) -> Result<(SimMount<E, S>, SimRig)> {
        let axis_for = |home: Steps, seek: Direction| {
            SimulatedAxis::new(home.0 - seek.sign() * seek_distance, home.0, seek)
        };
        let hour_angle = axis_for(
            config.axes.hour_angle.home_position,
            config.axes.hour_angle.seek_direction,
        );
        let declination = axis_for(
            config.axes.declination.home_position,
            config.axes.declination.seek_direction,
        );
        Self::mount_with(config, start, hour_angle, declination, ephemeris, sink)
    }

    /// Build a mount on the given simulated axes.
    pub fn mount_with<E: EphemerisSource, S: StatusSink>(
        config: MountConfig,
        start: DateTime<Utc>,
        hour_angle: SimulatedAxis,
        declination: SimulatedAxis,
        ephemeris: E,
        sink: S,
    ) -> Result<(SimMount<E, S>, SimRig)> {
        let clock = SimClock::new(start);
        let mount = MountBuilder::new(config)
            .hour_angle(hour_angle.driver(), hour_angle.switch())
            .declination(declination.driver(), declination.switch())
            .clock(clock.clone())
            .delay(clock.delay())
            .ephemeris(ephemeris)
            .status_sink(sink)
            .build()?;

        let rig = SimRig {
            clock,
            hour_angle: hour_angle.probe(),
            declination: declination.probe(),
        };
        Ok((mount, rig))
    }
}
