//! Enumerations passed to the travel-mode, rotation-mode and unit calls.

/// Travel mode reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    /// Not set or not reported.
    Undefined,
    /// Linear travel.
    Linear,
    /// Rotational travel.
    Rotational,
}

impl TravelMode {
    /// Decode the raw value; unknown values map to `Undefined`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => TravelMode::Linear,
            2 => TravelMode::Rotational,
            _ => TravelMode::Undefined,
        }
    }

    /// Raw value.
    pub fn raw(self) -> i32 {
        match self {
            TravelMode::Undefined => 0,
            TravelMode::Linear => 1,
            TravelMode::Rotational => 2,
        }
    }
}

/// How a rotational stage maps positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementMode {
    /// Bounded range, no wrapping.
    LinearRange,
    /// Unlimited rotation, position keeps counting.
    RotationalUnlimited,
    /// Position wraps every revolution.
    RotationalWrapping,
}

impl MovementMode {
    /// Raw value.
    pub fn raw(self) -> i32 {
        match self {
            MovementMode::LinearRange => 0,
            MovementMode::RotationalUnlimited => 1,
            MovementMode::RotationalWrapping => 2,
        }
    }
}

/// Direction used for absolute moves on wrapping stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDirection {
    /// Shortest path.
    Quickest,
    /// Always forwards.
    Forwards,
    /// Always in reverse.
    Reverse,
}

impl MovementDirection {
    /// Raw value.
    pub fn raw(self) -> i32 {
        match self {
            MovementDirection::Quickest => 0,
            MovementDirection::Forwards => 1,
            MovementDirection::Reverse => 2,
        }
    }
}

/// Quantity for the vendor unit-conversion calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitType {
    /// Position or distance.
    Distance,
    /// Velocity.
    Velocity,
    /// Acceleration.
    Acceleration,
}

impl UnitType {
    /// Raw value.
    pub fn raw(self) -> i32 {
        match self {
            UnitType::Distance => 0,
            UnitType::Velocity => 1,
            UnitType::Acceleration => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travel_mode_roundtrip() {
        for mode in [TravelMode::Undefined, TravelMode::Linear, TravelMode::Rotational] {
            assert_eq!(TravelMode::from_raw(mode.raw()), mode);
        }
        assert_eq!(TravelMode::from_raw(7), TravelMode::Undefined);
    }
}
