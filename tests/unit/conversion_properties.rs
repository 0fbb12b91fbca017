//! Property tests for unit conversion.

use proptest::prelude::*;

use kinesis_stage::config::AxisConfig;
use kinesis_stage::{Steps, UnitScale};

proptest! {
    /// Converting to device units and back is off by at most half a device unit.
    #[test]
    fn round_trip_within_half_unit(
        units_per_rev in 1.0f64..1.0e8,
        degrees in -1000.0f64..1000.0,
    ) {
        let scale = UnitScale::from_axis(&AxisConfig::rotational(units_per_rev));
        prop_assume!((degrees * scale.device_units_per_micrometer()).abs() < f64::from(i32::MAX));

        let steps = scale.physical_to_steps(degrees);
        let back = scale.steps_to_physical(Steps(i64::from(steps)));
        let lsb = 1.0 / scale.device_units_per_micrometer();
        prop_assert!((back - degrees).abs() <= lsb * 0.5 + 1e-9);
    }

    /// Targets beyond the i32 range clamp instead of wrapping.
    #[test]
    fn out_of_range_clamps(
        units_per_mm in 1.0f64..1.0e6,
        excess in 1.0f64..1.0e6,
    ) {
        let scale = UnitScale::from_axis(&AxisConfig::linear(units_per_mm));
        let limit = f64::from(i32::MAX) / scale.device_units_per_micrometer();

        prop_assert_eq!(scale.physical_to_steps(limit * 2.0 + excess), i32::MAX);
        prop_assert_eq!(scale.physical_to_steps(-(limit * 2.0 + excess)), i32::MIN);
    }

    /// Raw step targets saturate the same way.
    #[test]
    fn steps_saturate(steps in any::<i64>()) {
        let clamped = Steps(steps).saturating_i32();
        prop_assert_eq!(i64::from(clamped), steps.clamp(i64::from(i32::MIN), i64::from(i32::MAX)));
    }
}
