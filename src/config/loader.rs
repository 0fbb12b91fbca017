//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::StageConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use kinesis_stage::load_config;
///
/// let config = load_config("stages.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StageConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(truncate(&e.to_string(), 128)).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<StageConfig> {
    let config: StageConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(truncate(e.message(), 128)).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageType;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[stages.x]
serial_number = "70000001"
"#;

        let config = parse_config(toml).unwrap();
        let x = config.stage("x").unwrap();
        assert_eq!(x.channel, 0);
        assert_eq!(x.axis_config().stage_type, StageType::Linear);
        assert_eq!(config.polling_interval_ms, 100);
    }

    #[test]
    fn test_parse_rotator() {
        let toml = r#"
library = "Thorlabs.MotionControl.IntegratedStepperMotors.dll"
symbol_prefix = "ISC"
polling_interval_ms = 200

[stages.rotator]
serial_number = "55000001"
stage_type = "rotational"
device_units_per_revolution = 49152000.0
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.symbol_prefix.as_str(), "ISC");
        let axis = config.stage("rotator").unwrap().axis_config();
        assert!(axis.stage_type.is_rotational());
    }

    #[test]
    fn test_rejects_bad_serial() {
        let toml = r#"
[stages.x]
serial_number = "abc"
"#;
        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::InvalidSerialNumber(_)))
        ));
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("abcé", 4), "abc");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
