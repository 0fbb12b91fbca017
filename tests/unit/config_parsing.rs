//! Unit tests for TOML configuration parsing.

use kinesis_stage::config::{load_config, parse_config, StageConfig, StageType};
use kinesis_stage::error::{ConfigError, Error};

/// Test parsing a complete multi-stage configuration.
#[test]
fn test_parse_stage_config() {
    let toml_str = r#"
library = "Thorlabs.MotionControl.Benchtop.StepperMotor.dll"
symbol_prefix = "SBC"
polling_interval_ms = 150

[stages.x]
serial_number = "70000001"
channel = 1
device_units_per_millimeter = 409600.0

[stages.y]
serial_number = "70000001"
channel = 2
name = "Y stage"
device_units_per_millimeter = 409600.0
"#;

    let config: StageConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.polling_interval_ms, 150);
    assert_eq!(config.stage_names().count(), 2);

    let y = config.stage("y").expect("Stage not found");
    assert_eq!(y.channel, 2);
    assert_eq!(y.name.as_deref(), Some("Y stage"));
    assert_eq!(y.axis_config().device_units_per_millimeter, 409_600.0);
}

/// Test that family defaults fill in missing scale factors.
#[test]
fn test_family_defaults_applied() {
    let toml_str = r#"
[stages.jack]
serial_number = "49000123"

[stages.rotator]
serial_number = "55000123"

[stages.custom]
serial_number = "40000123"
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");

    let jack = config.stage("jack").unwrap().axis_config();
    assert_eq!(jack.stage_type, StageType::Linear);
    assert_eq!(jack.device_units_per_millimeter, 1_228_800.0);

    let rotator = config.stage("rotator").unwrap().axis_config();
    assert_eq!(rotator.stage_type, StageType::Rotational);
    assert_eq!(rotator.device_units_per_revolution, 49_152_000.0);

    let custom = config.stage("custom").unwrap().axis_config();
    assert_eq!(custom.device_units_per_millimeter, 1000.0);
    assert_eq!(custom.device_units_per_revolution, 360.0);
}

/// Test that an unknown stage type is a parse error.
#[test]
fn test_unknown_stage_type() {
    let toml_str = r#"
[stages.x]
serial_number = "70000001"
stage_type = "diagonal"
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}

/// Test loading a missing file.
#[test]
fn test_load_missing_file() {
    assert!(matches!(
        load_config("/nonexistent/stages.toml"),
        Err(Error::Config(ConfigError::IoError(_)))
    ));
}

/// Test loading a configuration file from disk.
#[test]
fn test_load_config_file() {
    let path = std::env::temp_dir().join(format!("kinesis-stage-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "[stages.rotator]\nserial_number = \"55000001\"\nchannel = 0\n",
    )
    .unwrap();

    let config = load_config(&path);
    let _ = std::fs::remove_file(&path);

    let config = config.expect("Failed to load config");
    assert!(config.stage("rotator").is_some());
}
