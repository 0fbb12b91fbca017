//! Motor drive facade.
//!
//! Wraps the capability binding for one device address and exposes typed
//! operations. Status codes are passed through, never interpreted.

mod address;
mod info;
mod modes;
mod motor_drive;
mod status;

pub use address::{DeviceAddress, MAX_CHANNEL, SERIAL_NUMBER_CAPACITY};
pub use info::HardwareInfo;
pub use modes::{MovementDirection, MovementMode, TravelMode, UnitType};
pub use motor_drive::MotorDrive;
pub use status::StatusBits;
