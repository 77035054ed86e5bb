//! Operator console.
//!
//! A line-oriented menu over any `BufRead`/`Write` pair:
//!
//! | input    | action                                             |
//! |----------|----------------------------------------------------|
//! | `t`      | follow the sun day after day                       |
//! | `h`      | home both axes                                     |
//! | `goto`   | prompt for RA (and optionally Dec), then slew      |
//! | `m`      | prompt for raw step counts per axis, then move     |
//! | `coords` | print the current status line                      |
//! | `clean`  | release both motors                                |
//! | other    | ask for confirmation, then exit                    |
//!
//! Input is validated before anything moves. A cancelled command returns
//! to the menu; errors are printed and the menu comes back with the motors
//! released. A cancellation raised while waiting at the menu ends the
//! session. On exit the last position is written to the state file.

use std::io::{BufRead, Write};

use embedded_hal::delay::DelayNs;

use crate::cancel::{CancelToken, Cancellation, Outcome};
use crate::clock::Clock;
use crate::config::units::Degrees;
use crate::control::{DriveOptions, Mount, StatusReport, StatusSink, Target};
use crate::ephemeris::EphemerisSource;
use crate::error::{MotionError, Result};
use crate::motor::{LimitSwitch, StepperDriver};

const MENU: &str = "solar-mount\n\
t = track sun\n\
h = home\n\
goto = GoTo\n\
m = manual control (RA and Dec)\n\
coords = print coordinates\n\
clean = release motors\n\
>>> ";

/// One menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `t`
    Track,
    /// `h`
    Home,
    /// `goto`
    Goto,
    /// `m`
    Manual,
    /// `coords`
    Coords,
    /// `clean`
    Clean,
    /// Anything else; leads to the exit confirmation.
    Other(String),
}

impl Command {
    /// Parse one input line. Surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "t" => Command::Track,
            "h" => Command::Home,
            "goto" => Command::Goto,
            "m" => Command::Manual,
            "coords" => Command::Coords,
            "clean" => Command::Clean,
            other => Command::Other(other.to_string()),
        }
    }
}

/// Check an operator-supplied right ascension: finite and in `[0, 360)`.
pub fn validate_right_ascension(value: f64) -> Result<Degrees> {
    if value.is_finite() && (0.0..360.0).contains(&value) {
        Ok(Degrees(value))
    } else {
        Err(MotionError::InvalidTarget {
            value,
            min: 0.0,
            max: 360.0,
        }
        .into())
    }
}

/// Check an operator-supplied step count against `max` in either direction.
pub fn validate_steps(steps: i64, max: u64) -> Result<i64> {
    if steps.unsigned_abs() <= max {
        Ok(steps)
    } else {
        Err(MotionError::InvalidTarget {
            value: steps as f64,
            min: -(max as f64),
            max: max as f64,
        }
        .into())
    }
}

/// The operator menu.
pub struct Console<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Read commands from `input`, write prompts and results to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu until the operator confirms exit or input ends.
    ///
    /// `cancel` interrupts the running command and is reset before the next
    /// prompt. Raised while the menu waits for input, it ends the session.
    ///
    /// # Errors
    ///
    /// Console I/O errors and failure to write the state file. Command
    /// errors are reported to the operator instead.
    pub fn run<D, L, C, Y, E, S>(
        &mut self,
        mount: &mut Mount<D, L, C, Y, E, S>,
        cancel: &CancelToken,
    ) -> Result<()>
    where
        D: StepperDriver,
        L: LimitSwitch,
        C: Clock,
        Y: DelayNs,
        E: EphemerisSource,
        S: StatusSink,
    {
        loop {
            if let Err(e) = mount.disable_all() {
                writeln!(self.output, "could not release motors: {}", e)?;
            }
            cancel.reset();

            let Some(line) = self.prompt(MENU)? else {
                break;
            };
            if cancel.is_cancelled() {
                log::info!("interrupted at the menu, leaving");
                break;
            }
            let command = Command::parse(&line);
            log::debug!("console command {:?}", command);

            let result = match command {
                Command::Track => mount.track_sun(cancel),
                Command::Home => mount.home_all(cancel),
                Command::Goto => self.goto(mount, cancel),
                Command::Manual => self.manual(mount, cancel),
                Command::Coords => {
                    let report = mount.print_status();
                    self.write_report(&report)?;
                    Ok(Outcome::Completed)
                }
                Command::Clean => mount.disable_all().map(|()| Outcome::Completed),
                Command::Other(_) => {
                    match self.prompt("Are you sure about that? [y/n]\n>>> ")? {
                        Some(answer) if answer.trim() == "y" => break,
                        Some(_) => continue,
                        None => break,
                    }
                }
            };

            match result {
                Ok(Outcome::Completed) => writeln!(self.output, "Done!")?,
                Ok(Outcome::Cancelled) => writeln!(self.output, "interrupted")?,
                Err(e) => {
                    log::warn!("command failed: {}", e);
                    writeln!(self.output, "error: {}", e)?;
                }
            }
        }

        mount.disable_all()?;
        let position = mount.save_last_position()?;
        writeln!(self.output, "last position: {}", position)?;
        Ok(())
    }

    fn goto<D, L, C, Y, E, S>(
        &mut self,
        mount: &mut Mount<D, L, C, Y, E, S>,
        cancel: &CancelToken,
    ) -> Result<Outcome>
    where
        D: StepperDriver,
        L: LimitSwitch,
        C: Clock,
        Y: DelayNs,
        E: EphemerisSource,
        S: StatusSink,
    {
        let report = mount.print_status();
        self.write_report(&report)?;

        let Some(ra) = self.prompt_number::<f64>("target RA (in deg): ")? else {
            return Ok(Outcome::Cancelled);
        };
        let right_ascension = validate_right_ascension(ra)?;

        let declination = match self.prompt("target Dec (in deg, empty to keep): ")? {
            Some(text) if !text.trim().is_empty() => {
                let value = parse_number::<f64>(&text)?;
                Some(mount.bounded_declination(Degrees(value))?)
            }
            _ => None,
        };

        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }
        let target = Target::Fixed {
            right_ascension,
            declination,
        };
        mount.drive_toward(target, DriveOptions::goto(), cancel)
    }

    fn manual<D, L, C, Y, E, S>(
        &mut self,
        mount: &mut Mount<D, L, C, Y, E, S>,
        cancel: &CancelToken,
    ) -> Result<Outcome>
    where
        D: StepperDriver,
        L: LimitSwitch,
        C: Clock,
        Y: DelayNs,
        E: EphemerisSource,
        S: StatusSink,
    {
        let max = mount.config().tracking.max_manual_steps;
        let Some(ra_steps) = self.prompt_number::<i64>("RA steps: ")? else {
            return Ok(Outcome::Cancelled);
        };
        let ra_steps = validate_steps(ra_steps, max)?;
        let Some(dec_steps) = self.prompt_number::<i64>("DEC steps: ")? else {
            return Ok(Outcome::Cancelled);
        };
        let dec_steps = validate_steps(dec_steps, max)?;

        mount.jog(ra_steps, dec_steps, cancel)
    }

    fn write_report(&mut self, report: &StatusReport) -> Result<()> {
        writeln!(self.output, "{}\n{}", StatusReport::HEADER, report)?;
        Ok(())
    }

    /// Print `text` and read one line; `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn prompt_number<T: std::str::FromStr>(&mut self, text: &str) -> Result<Option<T>> {
        match self.prompt(text)? {
            Some(line) => parse_number(&line).map(Some),
            None => Ok(None),
        }
    }
}

fn parse_number<T: std::str::FromStr>(text: &str) -> Result<T> {
    text.trim().parse().map_err(|_| {
        MotionError::InvalidTarget {
            value: f64::NAN,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("t\n"), Command::Track);
        assert_eq!(Command::parse(" h "), Command::Home);
        assert_eq!(Command::parse("goto"), Command::Goto);
        assert_eq!(Command::parse("m"), Command::Manual);
        assert_eq!(Command::parse("coords"), Command::Coords);
        assert_eq!(Command::parse("clean"), Command::Clean);
        assert_eq!(Command::parse("quit"), Command::Other("quit".into()));
        assert_eq!(Command::parse("T"), Command::Other("T".into()));
    }

    #[test]
    fn test_right_ascension_domain() {
        assert!(validate_right_ascension(0.0).is_ok());
        assert!(validate_right_ascension(359.999).is_ok());
        assert!(matches!(
            validate_right_ascension(360.0),
            Err(Error::Motion(MotionError::InvalidTarget { .. }))
        ));
        assert!(validate_right_ascension(-1.0).is_err());
        assert!(validate_right_ascension(f64::NAN).is_err());
    }

    #[test]
    fn test_step_bound() {
        assert_eq!(validate_steps(-1000, 1000).unwrap(), -1000);
        assert!(validate_steps(1001, 1000).is_err());
        assert!(validate_steps(i64::MIN, 1000).is_err());
    }

    /// Raises a token once the reader has consumed `at` bytes.
    struct RaiseAt {
        inner: std::io::Cursor<Vec<u8>>,
        token: CancelToken,
        at: Option<u64>,
    }

    impl std::io::Read for RaiseAt {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl BufRead for RaiseAt {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            self.inner.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.inner.consume(amt);
            if self.at.is_some_and(|at| self.inner.position() >= at) {
                self.at = None;
                self.token.cancel();
            }
        }
    }

    fn session(input: &str, tag: &str) -> (String, crate::sim::SimRig, std::path::PathBuf) {
        session_with(std::io::Cursor::new(input.to_string()), &CancelToken::new(), tag)
    }

    fn session_with<R: BufRead>(
        input: R,
        cancel: &CancelToken,
        tag: &str,
    ) -> (String, crate::sim::SimRig, std::path::PathBuf) {
        use chrono::{TimeZone, Utc};
        use crate::config::MountConfig;
        use crate::control::NullSink;
        use crate::ephemeris::FixedEphemeris;
        use crate::sim::SimRig;

        let path = std::env::temp_dir().join(format!("sm-console-{}-{}.txt", tag, std::process::id()));
        let mut config = MountConfig::default();
        config.state_file = heapless::String::try_from(path.to_str().unwrap()).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 6, 21, 10, 0, 0).unwrap();
        let (mut mount, rig) = SimRig::mount(
            config,
            start,
            10,
            FixedEphemeris::new(90.0, 23.4, 40.0, 120.0),
            NullSink,
        )
        .unwrap();

        let mut console = Console::new(input, Vec::new());
        console.run(&mut mount, cancel).unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();
        (output, rig, path)
    }

    #[test]
    fn test_session_jogs_and_exits() {
        let (output, rig, path) = session("coords\nm\n100\n-50\nclean\nquit\ny\n", "jog");

        assert!(output.contains(StatusReport::HEADER));
        assert_eq!(output.matches("Done!").count(), 3);
        assert_eq!(rig.hour_angle.steps_moved(), 100);
        assert_eq!(rig.declination.steps_moved(), 50);
        assert!(!rig.hour_angle.is_enabled());
        assert!(!rig.declination.is_enabled());

        let saved = crate::persist::LastPosition::load(&path).unwrap();
        assert_eq!(saved.hour_angle_steps.0, 621_000 + 100);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_session_reports_bad_input_and_continues() {
        let (output, rig, path) = session("m\n99999999\ngoto\n400\nx\nn\n", "bad");

        // prompts and replies share a line, and messages read "error: Motion error: ..."
        let errors = output.lines().filter(|line| line.contains("error: ")).count();
        assert_eq!(errors, 2);
        assert!(output.contains("Are you sure about that?"));
        assert_eq!(rig.hour_angle.moves(), 0);
        assert_eq!(rig.declination.moves(), 0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_interrupted_command_returns_to_menu() {
        let cancel = CancelToken::new();
        let script = "m\n100\n0\ncoords\nquit\ny\n";
        let input = RaiseAt {
            inner: std::io::Cursor::new(script.as_bytes().to_vec()),
            token: cancel.clone(),
            at: Some("m\n100\n0\n".len() as u64),
        };
        let (output, rig, path) = session_with(input, &cancel, "interrupt");

        assert_eq!(output.matches("interrupted").count(), 1);
        assert_eq!(output.matches("Done!").count(), 1);
        assert_eq!(rig.hour_angle.steps_moved(), 0);
        assert!(!cancel.is_cancelled());

        let saved = crate::persist::LastPosition::load(&path).unwrap();
        assert_eq!(saved.hour_angle_steps.0, 621_000);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_interrupt_at_menu_ends_session() {
        let cancel = CancelToken::new();
        let input = RaiseAt {
            inner: std::io::Cursor::new(b"coords\nm\n5\n5\n".to_vec()),
            token: cancel.clone(),
            at: Some("coords\n".len() as u64),
        };
        let (output, rig, path) = session_with(input, &cancel, "leave");

        assert!(!output.contains("Done!"));
        assert!(output.contains("last position:"));
        assert_eq!(rig.hour_angle.moves(), 0);
        assert!(crate::persist::LastPosition::load(&path).is_ok());
        let _ = std::fs::remove_file(&path);
    }
}
