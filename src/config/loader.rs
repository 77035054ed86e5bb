//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{truncated, ConfigError, Error, Result};

use super::MountConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use solar_mount::load_config;
///
/// let config = load_config("mount.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MountConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        Error::Config(ConfigError::IoError(truncated(&e.to_string())))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<MountConfig> {
    let config: MountConfig = toml::from_str(content).map_err(|e| {
        let msg = truncated(e.message());
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_station_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.axes.hour_angle.home_position.0, 172_500);
        assert_eq!(config.state_file.as_str(), "lastPos.txt");
    }

    #[test]
    fn test_parse_schedule() {
        let toml = r#"
[schedule]
start = "06:30"
stop = "18:00"
park = "23:15:00"
utc_offset_minutes = 120
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.schedule.start.seconds_from_midnight(), 6 * 3600 + 1800);
        assert_eq!(config.schedule.park.seconds_from_midnight(), 23 * 3600 + 900);
        assert_eq!(config.schedule.lead_minutes, 60);
    }

    #[test]
    fn test_parse_rejects_bad_time() {
        let toml = r#"
[schedule]
start = "6h30"
stop = "18:00"
park = "23:00"
"#;

        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }
}
