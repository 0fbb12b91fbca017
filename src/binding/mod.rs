//! Capability binding to the vendor motion-control library.
//!
//! [`MotionControlLibrary`] has one method per vendor entry point. Every
//! method returns `Err` only when the entry point could not be reached at all
//! (library missing, symbol missing); whatever the vendor call itself returns
//! is passed through untouched.
//!
//! - [`KinesisLibrary`] (feature `std`) resolves the entry points from a
//!   shared library at runtime.
//! - [`FakeLibrary`] is an in-memory scripted device for tests and demos.

mod fake;
#[cfg(feature = "std")]
mod kinesis;

pub use fake::{Call, FakeDevice, FakeLibrary};
#[cfg(feature = "std")]
pub use kinesis::KinesisLibrary;

use crate::error::Result;

/// Capacity of the model-number buffer, including the terminating NUL.
pub const MODEL_NUMBER_CAPACITY: usize = 8;

/// Capacity of the notes buffer, including the terminating NUL.
pub const NOTES_CAPACITY: usize = 48;

/// Caller-owned output buffers for the hardware-info call.
///
/// Sizes are fixed and passed to the library explicitly; text the library
/// writes is NUL-terminated within its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareInfoBuffers {
    /// Model number text.
    pub model_number: [u8; MODEL_NUMBER_CAPACITY],
    /// Hardware type code.
    pub hardware_type: u16,
    /// Number of channels.
    pub channel_count: u16,
    /// Free-form notes text.
    pub notes: [u8; NOTES_CAPACITY],
    /// Packed firmware version.
    pub firmware_version: u32,
    /// Hardware revision.
    pub hardware_version: u16,
    /// Modification state.
    pub modification_state: u16,
}

impl Default for HardwareInfoBuffers {
    fn default() -> Self {
        Self {
            model_number: [0; MODEL_NUMBER_CAPACITY],
            hardware_type: 0,
            channel_count: 0,
            notes: [0; NOTES_CAPACITY],
            firmware_version: 0,
            hardware_version: 0,
            modification_state: 0,
        }
    }
}

/// The vendor library's operations.
///
/// Status codes are `0` on success and a vendor error code otherwise. The
/// serial number identifies the controller; `channel` selects the axis on it.
pub trait MotionControlLibrary {
    /// Whether the library was found and loaded. Never fails.
    fn is_available(&self) -> bool;

    /// Open the controller.
    fn open(&self, serial: &str) -> Result<i16>;
    /// Close the controller.
    fn close(&self, serial: &str) -> Result<()>;
    /// Number of channels on the controller.
    fn channel_count(&self, serial: &str) -> Result<i16>;

    /// Ask the device to send its settings.
    fn request_settings(&self, serial: &str, channel: u16) -> Result<i16>;
    /// Ask the device to send its status bits.
    fn request_status_bits(&self, serial: &str, channel: u16) -> Result<i16>;
    /// Ask the device to send its position.
    fn request_position(&self, serial: &str, channel: u16) -> Result<i16>;

    /// Start the library's background polling.
    fn start_polling(&self, serial: &str, channel: u16, interval_ms: i32) -> Result<bool>;
    /// Stop background polling.
    fn stop_polling(&self, serial: &str, channel: u16) -> Result<()>;

    /// Fill `out` with hardware information.
    fn hardware_info(&self, serial: &str, channel: u16, out: &mut HardwareInfoBuffers)
        -> Result<i16>;

    /// Last polled status bits.
    fn status_bits(&self, serial: &str, channel: u16) -> Result<u32>;

    /// Enable the channel's motor output.
    fn enable_channel(&self, serial: &str, channel: u16) -> Result<i16>;
    /// Disable the channel's motor output.
    fn disable_channel(&self, serial: &str, channel: u16) -> Result<i16>;

    /// Raw travel mode.
    fn travel_mode(&self, serial: &str, channel: u16) -> Result<i32>;
    /// Set the raw travel mode.
    fn set_travel_mode(&self, serial: &str, channel: u16, mode: i32) -> Result<i16>;
    /// Reset rotation modes to the device defaults.
    fn reset_rotation_modes(&self, serial: &str, channel: u16) -> Result<i16>;
    /// Set raw rotation movement mode and direction.
    fn set_rotation_modes(&self, serial: &str, channel: u16, mode: i32, direction: i32)
        -> Result<i16>;

    /// Last polled position.
    fn position(&self, serial: &str, channel: u16) -> Result<i32>;
    /// Last polled position counter.
    fn position_counter(&self, serial: &str, channel: u16) -> Result<i64>;
    /// Start a move to an absolute position in device units.
    fn move_to_position(&self, serial: &str, channel: u16, index: i32) -> Result<i16>;

    /// Whether the device can home.
    fn can_home(&self, serial: &str, channel: u16) -> Result<bool>;
    /// Start homing.
    fn home(&self, serial: &str, channel: u16) -> Result<i16>;

    /// Vendor conversion from device units to a real value.
    fn real_value_from_device_unit(
        &self,
        serial: &str,
        channel: u16,
        device_units: i32,
        unit_type: i32,
    ) -> Result<(i16, f64)>;
    /// Vendor conversion from a real value to device units.
    fn device_unit_from_real_value(
        &self,
        serial: &str,
        channel: u16,
        real_value: f64,
        unit_type: i32,
    ) -> Result<(i16, i32)>;
}
