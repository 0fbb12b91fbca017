//! Unit types for physical quantities.
//!
//! Keeps raw device units apart from the physical values the host sees, so a
//! step count is never passed where micrometers are expected.

use serde::Deserialize;

/// Kind of motion a stage performs, which fixes its physical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    /// Translation stage, positions in micrometers.
    #[default]
    Linear,
    /// Rotation stage, positions in degrees.
    Rotational,
}

impl StageType {
    /// Whether positions are angles.
    #[inline]
    pub const fn is_rotational(self) -> bool {
        matches!(self, StageType::Rotational)
    }

    /// Symbol of the physical unit.
    pub const fn unit_symbol(self) -> &'static str {
        match self {
            StageType::Linear => "um",
            StageType::Rotational => "deg",
        }
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            StageType::Linear => "Linear",
            StageType::Rotational => "Rotational",
        }
    }
}

/// Raw device position (device units, not necessarily motor steps).
///
/// Uses i64 to match the widest position read the hardware reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Steps(pub i64);

impl Steps {
    /// Create a new Steps value.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Saturate into the range accepted by move commands.
    #[inline]
    pub fn saturating_i32(self) -> i32 {
        i32::try_from(self.0).unwrap_or(if self.0 < 0 { i32::MIN } else { i32::MAX })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_saturation() {
        assert_eq!(Steps::new(12).saturating_i32(), 12);
        assert_eq!(Steps::new(i64::MAX).saturating_i32(), i32::MAX);
        assert_eq!(Steps::new(i64::from(i32::MIN) - 1).saturating_i32(), i32::MIN);
    }

    #[test]
    fn test_stage_type_units() {
        assert_eq!(StageType::Linear.unit_symbol(), "um");
        assert!(StageType::Rotational.is_rotational());
    }
}
