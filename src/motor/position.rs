//! Conversion between device units and physical positions.
//!
//! Physical positions are micrometers on linear stages and degrees on
//! rotational ones; both use the same single scale factor.

use crate::config::units::Steps;
use crate::config::AxisConfig;

/// Device-units-per-physical-unit scale, fixed at initialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    /// Device units per micrometer (or per degree)
    device_units_per_micrometer: f64,
}

impl UnitScale {
    /// Create a scale from device units per physical unit.
    #[inline]
    pub fn new(device_units_per_micrometer: f64) -> Self {
        Self {
            device_units_per_micrometer,
        }
    }

    /// Derive the scale from an axis configuration.
    #[inline]
    pub fn from_axis(config: &AxisConfig) -> Self {
        Self::new(config.device_units_per_micrometer())
    }

    /// Device units per micrometer (or per degree).
    #[inline]
    pub fn device_units_per_micrometer(&self) -> f64 {
        self.device_units_per_micrometer
    }

    /// Raw device position to physical units.
    #[inline]
    pub fn steps_to_physical(&self, steps: Steps) -> f64 {
        steps.0 as f64 / self.device_units_per_micrometer
    }

    /// Physical units to a move target, rounded and saturated to `i32`.
    ///
    /// Out-of-range targets clamp to `i32::MIN`/`i32::MAX`; NaN maps to 0.
    pub fn physical_to_steps(&self, value: f64) -> i32 {
        let steps = libm::round(value * self.device_units_per_micrometer);
        let clamped = clamp_i32(steps);
        if f64::from(clamped) != steps && !steps.is_nan() {
            debug!("move target {} clamped to {} device units", value, clamped);
        }
        clamped
    }
}

/// Saturate a float to the `i32` range.
///
/// `as` already saturates and maps NaN to 0; spelled out here because the
/// move command relies on it.
#[inline]
pub fn clamp_i32(value: f64) -> i32 {
    if value.is_nan() {
        0
    } else if value <= f64::from(i32::MIN) {
        i32::MIN
    } else if value >= f64::from(i32::MAX) {
        i32::MAX
    } else {
        value as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotational_ninety_degrees() {
        let scale = UnitScale::from_axis(&AxisConfig::rotational(49_152_000.0));
        assert_eq!(scale.physical_to_steps(90.0), 12_288_000);
        assert!((scale.steps_to_physical(Steps(12_288_000)) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_conversion() {
        // 1000 units/mm = 1 unit/um
        let scale = UnitScale::from_axis(&AxisConfig::linear(1000.0));
        assert_eq!(scale.physical_to_steps(1234.4), 1234);
        assert_eq!(scale.physical_to_steps(-0.6), -1);
    }

    #[test]
    fn test_saturation() {
        let scale = UnitScale::new(136_533.333);
        assert_eq!(scale.physical_to_steps(1.0e9), i32::MAX);
        assert_eq!(scale.physical_to_steps(-1.0e9), i32::MIN);
        assert_eq!(scale.physical_to_steps(f64::NAN), 0);
        assert_eq!(scale.physical_to_steps(f64::INFINITY), i32::MAX);
    }
}
