//! Observational status lines.

use core::fmt;

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::config::units::{Degrees, Steps};

/// Snapshot of sun and antenna coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusReport {
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    /// Sun right ascension.
    pub sun_right_ascension: Degrees,
    /// Sun declination.
    pub sun_declination: Degrees,
    /// Sun hour angle.
    pub sun_hour_angle: Degrees,
    /// Believed antenna right ascension.
    pub antenna_right_ascension: Degrees,
    /// Believed antenna declination.
    pub antenna_declination: Degrees,
    /// Believed antenna hour angle.
    pub antenna_hour_angle: Degrees,
    /// Absolute step count of the hour-angle axis.
    pub hour_angle_steps: Steps,
    /// Absolute step count of the declination axis.
    pub declination_steps: Steps,
}

impl StatusReport {
    /// Column titles matching the [`Display`](fmt::Display) output.
    pub const HEADER: &'static str = "           UTC            |   Sun RA     Sun Dec      Sun HA   |  antenna RA  antenna Dec  antenna HA  |  HA steps   Dec steps";
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.timestamp;
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:03} ",
            t.year(),
            t.month(),
            t.day(),
            t.hour(),
            t.minute(),
            t.second(),
            t.timestamp_subsec_millis().min(999),
        )?;
        write!(
            f,
            "| {:>10.4} {:>10.4} {:>10.4} | {:>11.6} {:>11.6} {:>11.6} | {:>9} {:>9}",
            self.sun_right_ascension.0,
            self.sun_declination.0,
            self.sun_hour_angle.0,
            self.antenna_right_ascension.0,
            self.antenna_declination.0,
            self.antenna_hour_angle.0,
            self.hour_angle_steps.0,
            self.declination_steps.0,
        )
    }
}

/// Receives status snapshots. Reporting never influences control.
pub trait StatusSink {
    /// Handle one snapshot.
    fn report(&mut self, report: &StatusReport);
}

impl<S: StatusSink + ?Sized> StatusSink for &mut S {
    fn report(&mut self, report: &StatusReport) {
        (**self).report(report)
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn report(&mut self, _report: &StatusReport) {}
}

/// Collects reports in memory.
#[cfg(feature = "std")]
impl StatusSink for std::vec::Vec<StatusReport> {
    fn report(&mut self, report: &StatusReport) {
        self.push(*report);
    }
}

/// Writes a header once, then one pipe-delimited row per report.
#[cfg(feature = "std")]
pub struct WriterSink<W: std::io::Write> {
    writer: W,
    header_written: bool,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> WriterSink<W> {
    /// Wrap a writer, e.g. `std::io::stdout()`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> StatusSink for WriterSink<W> {
    fn report(&mut self, report: &StatusReport) {
        let result = if self.header_written {
            writeln!(self.writer, "{}", report)
        } else {
            self.header_written = true;
            writeln!(self.writer, "{}\n{}", StatusReport::HEADER, report)
        };
        if let Err(e) = result {
            log::warn!("status line dropped: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> StatusReport {
        StatusReport {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 21, 10, 0, 0).unwrap(),
            sun_right_ascension: Degrees(89.5),
            sun_declination: Degrees(23.44),
            sun_hour_angle: Degrees(345.0),
            antenna_right_ascension: Degrees(89.5),
            antenna_declination: Degrees(23.44),
            antenna_hour_angle: Degrees(345.0),
            hour_angle_steps: Steps(224_250),
            declination_steps: Steps(574_218),
        }
    }

    #[test]
    fn test_row_has_four_columns() {
        let row = sample().to_string();
        assert_eq!(row.split('|').count(), 4);
        assert!(row.starts_with("2024-06-21 10:00:00.000"));
        assert!(row.ends_with("224250    574218"));
    }

    #[test]
    fn test_writer_sink_writes_header_once() {
        let mut sink = WriterSink::new(Vec::new());
        sink.report(&sample());
        sink.report(&sample());

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], StatusReport::HEADER);
    }
}
