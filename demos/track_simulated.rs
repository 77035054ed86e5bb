//! Example: One simulated observation day.
//!
//! This example demonstrates how to:
//! - Load the mount configuration from TOML
//! - Build a mount on simulated axes, switches and clock
//! - Run the autonomous cycle (home, wait for the window, track, re-home, park)
//!
//! Simulated time advances with every delay, so a full day runs in seconds.
//! Status lines go to stdout every ten simulated minutes. The run ends by
//! cancellation, which writes the last position to the state file.
//!
//! Run with: `cargo run --example track_simulated --features std`

use chrono::{Duration, TimeZone, Utc};
use solar_mount::config::parse_config;
use solar_mount::sim::{CancelAt, SimRig};
use solar_mount::{Clock, LowPrecisionSun, Result, WriterSink};

fn main() -> Result<()> {
    println!("=== Simulated Solar Tracking Example ===\n");

    let config = parse_config(include_str!("mount.toml"))?;
    println!(
        "Site: lat {:.4}, lon {:.4}",
        config.site.latitude, config.site.longitude
    );
    println!(
        "Window: {} - {} local, park at {}\n",
        config.schedule.start.0, config.schedule.stop.0, config.schedule.park.0
    );

    // Midsummer, an hour before the window opens (UTC+1).
    let start = Utc.with_ymd_and_hms(2024, 6, 21, 4, 30, 0).unwrap();
    let (mut mount, rig) = SimRig::mount(
        config,
        start,
        500,
        LowPrecisionSun,
        WriterSink::new(std::io::stdout()),
    )?;

    // Stop shortly after the evening park has been entered.
    let cancel = CancelAt::new(&rig.clock, start + Duration::hours(18));
    let outcome = mount.run_autonomous(&cancel)?;

    println!("\nOutcome: {:?} at {}", outcome, rig.clock.now());
    println!(
        "Hour-angle axis: {} steps moved, now at {}",
        rig.hour_angle.steps_moved(),
        rig.hour_angle.position().0
    );
    println!(
        "Declination axis: {} steps moved, now at {}",
        rig.declination.steps_moved(),
        rig.declination.position().0
    );
    println!(
        "Motors released: {}",
        !rig.hour_angle.is_enabled() && !rig.declination.is_enabled()
    );

    Ok(())
}
