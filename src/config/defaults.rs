//! Device-family defaults keyed by serial-number prefix.
//!
//! The vendor encodes the device type in the first two digits of the serial
//! number. Integrated stages have known scale factors; for anything else the
//! defaults are deliberately small so a misconfigured axis moves very little.

use super::units::StageType;

/// Fallback device units per millimeter.
pub const DEFAULT_DEVICE_UNITS_PER_MILLIMETER: f64 = 1000.0;

/// Fallback device units per revolution.
pub const DEFAULT_DEVICE_UNITS_PER_REVOLUTION: f64 = 360.0;

/// Device family recognized from a serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFamily {
    /// K10CR1-style cage rotator.
    CageRotator,
    /// 50 mm lab jack.
    LabJack050,
    /// 490 lab jack.
    LabJack490,
    /// LTS-style long travel stage.
    LongTravelStage,
    /// Vertical translation stage.
    VerticalStage,
    /// Controller driving a user-supplied actuator.
    Generic,
}

impl DeviceFamily {
    /// Stage type the family is known to be, if fixed.
    pub const fn stage_type(self) -> StageType {
        match self {
            DeviceFamily::CageRotator => StageType::Rotational,
            _ => StageType::Linear,
        }
    }

    /// Known device units per millimeter.
    pub const fn device_units_per_millimeter(self) -> f64 {
        match self {
            DeviceFamily::LabJack050 => 1_228_800.0,
            DeviceFamily::LabJack490 => 134_737.0,
            DeviceFamily::LongTravelStage => 409_600.0,
            DeviceFamily::VerticalStage => 25_050.0,
            _ => DEFAULT_DEVICE_UNITS_PER_MILLIMETER,
        }
    }

    /// Known device units per revolution.
    pub const fn device_units_per_revolution(self) -> f64 {
        match self {
            DeviceFamily::CageRotator => 49_152_000.0,
            _ => DEFAULT_DEVICE_UNITS_PER_REVOLUTION,
        }
    }
}

/// Identify the device family from a serial number.
pub fn device_family(serial_number: &str) -> DeviceFamily {
    match serial_number.get(..2) {
        Some("24") => DeviceFamily::VerticalStage,
        Some("45") => DeviceFamily::LongTravelStage,
        Some("46") => DeviceFamily::LabJack490,
        Some("49") => DeviceFamily::LabJack050,
        Some("55") => DeviceFamily::CageRotator,
        _ => DeviceFamily::Generic,
    }
}
