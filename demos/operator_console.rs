//! Operator console on simulated hardware.
//!
//! Reads commands from stdin (`t`, `h`, `goto`, `m`, `coords`, `clean`) and
//! drives a simulated mount. Simulated time starts at the current wall clock
//! and advances with every delay, so slews finish instantly.
//!
//! A saved position from a previous session is restored when the state file
//! exists. Ctrl-C interrupts the running command; pressed at the menu, it
//! ends the session after the next line of input.
//!
//! Run with: `cargo run --example operator_console --features std [mount.toml]`

use std::io;

use chrono::Utc;
use solar_mount::sim::SimRig;
use solar_mount::{load_config, CancelToken, Console, LastPosition, LowPrecisionSun, MountConfig, Result, WriterSink};

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(path)?,
        None => MountConfig::default(),
    };
    let state_file = config.state_file.clone();

    let (mut mount, _rig) = SimRig::mount(
        config,
        Utc::now(),
        2000,
        LowPrecisionSun,
        WriterSink::new(io::stderr()),
    )?;

    match LastPosition::load(state_file.as_str()) {
        Ok(position) => {
            println!("restored last position: {}", position);
            mount.restore(&position);
        }
        Err(e) => println!("no saved position ({}), starting unhomed", e),
    }

    let cancel = CancelToken::new();
    cancel.raise_on_interrupt()?;
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    console.run(&mut mount, &cancel)
}
