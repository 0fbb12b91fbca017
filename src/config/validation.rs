//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use crate::drive::MAX_CHANNEL;

use super::{AxisConfig, StageConfig, StageEntry};

/// Longest polling interval accepted.
pub const MAX_POLLING_INTERVAL_MS: u32 = 10_000;

/// Validate a stage configuration.
///
/// Checks:
/// - Polling interval is 1-10000 ms
/// - Serial numbers are non-empty and numeric
/// - Channels are addressable by the vendor library
/// - Resolved scale factors are finite and positive
pub fn validate_config(config: &StageConfig) -> Result<()> {
    validate_polling_interval(config.polling_interval_ms)?;

    for (_, stage) in config.stages.iter() {
        validate_stage(stage)?;
    }

    Ok(())
}

/// Validate a polling interval.
pub fn validate_polling_interval(interval_ms: u32) -> Result<()> {
    if interval_ms == 0 || interval_ms > MAX_POLLING_INTERVAL_MS {
        return Err(Error::Config(ConfigError::InvalidPollingInterval(interval_ms)));
    }
    Ok(())
}

/// Validate a serial number.
pub fn validate_serial_number(serial_number: &str) -> Result<()> {
    if serial_number.is_empty() || !serial_number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Config(ConfigError::InvalidSerialNumber(
            heapless::String::try_from(serial_number).unwrap_or_default(),
        )));
    }
    Ok(())
}

/// Validate the scale factors of an axis.
pub fn validate_axis(axis: &AxisConfig) -> Result<()> {
    for value in [axis.device_units_per_millimeter, axis.device_units_per_revolution] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::Config(ConfigError::InvalidScale(value)));
        }
    }
    Ok(())
}

fn validate_stage(stage: &StageEntry) -> Result<()> {
    validate_serial_number(&stage.serial_number)?;
    if stage.channel > MAX_CHANNEL {
        return Err(Error::Config(ConfigError::InvalidChannel(stage.channel)));
    }
    validate_axis(&stage.axis_config())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_scale() {
        let axis = AxisConfig::linear(-1.0);
        assert!(matches!(
            validate_axis(&axis),
            Err(Error::Config(ConfigError::InvalidScale(_)))
        ));

        let axis = AxisConfig::rotational(f64::NAN);
        assert!(validate_axis(&axis).is_err());
    }

    #[test]
    fn test_serial_numbers() {
        assert!(validate_serial_number("55000001").is_ok());
        assert!(validate_serial_number("").is_err());
        assert!(validate_serial_number("55-0001").is_err());
    }

    #[test]
    fn test_polling_interval_bounds() {
        assert!(validate_polling_interval(0).is_err());
        assert!(validate_polling_interval(100).is_ok());
        assert!(validate_polling_interval(MAX_POLLING_INTERVAL_MS + 1).is_err());
    }
}
