//! Axis configuration: stage type and device-unit scale factors.

use serde::Deserialize;

use super::defaults::{self, DEFAULT_DEVICE_UNITS_PER_MILLIMETER, DEFAULT_DEVICE_UNITS_PER_REVOLUTION};
use super::units::StageType;

/// Per-axis conversion settings.
///
/// There is no reliable way to query the actuator pitch or the device units
/// per revolution from the hardware, so the user supplies them. They are read
/// once when the stage initializes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AxisConfig {
    /// Linear or rotational.
    #[serde(default)]
    pub stage_type: StageType,

    /// Device units per millimeter of travel (linear stages).
    #[serde(default = "default_units_per_mm")]
    pub device_units_per_millimeter: f64,

    /// Device units per full revolution (rotational stages).
    #[serde(default = "default_units_per_rev")]
    pub device_units_per_revolution: f64,
}

fn default_units_per_mm() -> f64 {
    DEFAULT_DEVICE_UNITS_PER_MILLIMETER
}

fn default_units_per_rev() -> f64 {
    DEFAULT_DEVICE_UNITS_PER_REVOLUTION
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            stage_type: StageType::Linear,
            device_units_per_millimeter: DEFAULT_DEVICE_UNITS_PER_MILLIMETER,
            device_units_per_revolution: DEFAULT_DEVICE_UNITS_PER_REVOLUTION,
        }
    }
}

impl AxisConfig {
    /// Linear axis with the given scale.
    pub fn linear(device_units_per_millimeter: f64) -> Self {
        Self {
            stage_type: StageType::Linear,
            device_units_per_millimeter,
            ..Self::default()
        }
    }

    /// Rotational axis with the given scale.
    pub fn rotational(device_units_per_revolution: f64) -> Self {
        Self {
            stage_type: StageType::Rotational,
            device_units_per_revolution,
            ..Self::default()
        }
    }

    /// Defaults for the device family encoded in `serial_number`.
    pub fn for_serial(serial_number: &str) -> Self {
        let family = defaults::device_family(serial_number);
        Self {
            stage_type: family.stage_type(),
            device_units_per_millimeter: family.device_units_per_millimeter(),
            device_units_per_revolution: family.device_units_per_revolution(),
        }
    }

    /// Device units per micrometer (linear) or per degree (rotational).
    pub fn device_units_per_micrometer(&self) -> f64 {
        match self.stage_type {
            StageType::Linear => self.device_units_per_millimeter / 1000.0,
            StageType::Rotational => self.device_units_per_revolution / 360.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let config = AxisConfig::linear(409_600.0);
        assert!((config.device_units_per_micrometer() - 409.6).abs() < 1e-9);
    }

    #[test]
    fn test_rotational_scale() {
        let config = AxisConfig::rotational(49_152_000.0);
        // 49152000 / 360 = 136533.33
        assert!((config.device_units_per_micrometer() - 136_533.333_333).abs() < 1e-3);
    }

    #[test]
    fn test_serial_defaults() {
        let config = AxisConfig::for_serial("55001234");
        assert_eq!(config.stage_type, StageType::Rotational);

        let config = AxisConfig::for_serial("70001234");
        assert_eq!(config, AxisConfig::default());
    }
}
