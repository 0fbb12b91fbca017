//! Unit tests for configuration validation.

use kinesis_stage::config::{validate_config, AxisConfig, StageConfig};
use kinesis_stage::config::{validate_axis, validate_serial_number};
use kinesis_stage::error::{ConfigError, Error};

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
polling_interval_ms = 100

[stages.x]
serial_number = "70000001"
device_units_per_millimeter = 409600.0
"#;

    let config: StageConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for a zero polling interval.
#[test]
fn test_zero_polling_interval() {
    let toml_str = r#"
polling_interval_ms = 0
"#;

    let config: StageConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidPollingInterval(0)))
    ));
}

/// Test validation fails for a negative scale factor.
#[test]
fn test_negative_scale() {
    let toml_str = r#"
[stages.x]
serial_number = "70000001"
device_units_per_millimeter = -5.0
"#;

    let config: StageConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidScale(v))) if v == -5.0
    ));
}

/// Test validation fails for a channel the vendor library cannot address.
#[test]
fn test_channel_out_of_range() {
    let toml_str = r#"
[stages.x]
serial_number = "70000001"
channel = 40000
"#;

    let config: StageConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidChannel(40000)))
    ));
}

/// Test rotational scale checks.
#[test]
fn test_rotational_scale() {
    assert!(validate_axis(&AxisConfig::rotational(49_152_000.0)).is_ok());
    assert!(validate_axis(&AxisConfig::rotational(0.0)).is_err());
    assert!(validate_axis(&AxisConfig::rotational(f64::NAN)).is_err());
}

/// Test serial number format.
#[test]
fn test_serial_numbers() {
    assert!(validate_serial_number("55000001").is_ok());
    assert!(validate_serial_number("").is_err());
    assert!(validate_serial_number("55-0001").is_err());
}
