//! Per-channel handle over the vendor library.

use crate::binding::{HardwareInfoBuffers, MotionControlLibrary};
use crate::error::{Error, Result};

use super::address::DeviceAddress;
use super::info::HardwareInfo;
use super::modes::{MovementDirection, MovementMode, TravelMode, UnitType};
use super::status::StatusBits;

/// Typed access to one axis through a shared library binding.
///
/// Calls returning a vendor status are mapped to `Ok(())` for `0` and
/// `Err(Error::Hardware(code))` otherwise; nothing else is interpreted.
pub struct MotorDrive<'a, L: MotionControlLibrary> {
    library: &'a L,
    address: DeviceAddress,
}

impl<'a, L: MotionControlLibrary> Clone for MotorDrive<'a, L> {
    fn clone(&self) -> Self {
        Self {
            library: self.library,
            address: self.address.clone(),
        }
    }
}

impl<'a, L: MotionControlLibrary> MotorDrive<'a, L> {
    /// Create a handle for `address`.
    pub fn new(library: &'a L, address: DeviceAddress) -> Self {
        Self { library, address }
    }

    /// Address used on every call.
    #[inline]
    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    /// Underlying library.
    #[inline]
    pub fn library(&self) -> &'a L {
        self.library
    }

    #[inline]
    fn serial(&self) -> &str {
        self.address.serial_number()
    }

    #[inline]
    fn channel(&self) -> u16 {
        self.address.channel()
    }

    // Connection

    /// Open the controller.
    pub fn open(&self) -> Result<()> {
        Error::check(self.library.open(self.serial())?)
    }

    /// Close the controller.
    pub fn close(&self) -> Result<()> {
        self.library.close(self.serial())
    }

    /// Number of channels on the controller.
    ///
    /// A negative count is a vendor error code.
    pub fn channel_count(&self) -> Result<u16> {
        let count = self.library.channel_count(self.serial())?;
        u16::try_from(count).map_err(|_| Error::Hardware(count))
    }

    // Asynchronous requests

    /// Ask the device to send its settings.
    pub fn request_settings(&self) -> Result<()> {
        Error::check(self.library.request_settings(self.serial(), self.channel())?)
    }

    /// Ask the device to send its status bits.
    pub fn request_status_bits(&self) -> Result<()> {
        Error::check(self.library.request_status_bits(self.serial(), self.channel())?)
    }

    /// Ask the device to send its position.
    pub fn request_position(&self) -> Result<()> {
        Error::check(self.library.request_position(self.serial(), self.channel())?)
    }

    // Polling

    /// Start background polling; `false` if the library refused.
    pub fn start_polling(&self, interval_ms: u32) -> Result<bool> {
        let interval = i32::try_from(interval_ms).unwrap_or(i32::MAX);
        self.library.start_polling(self.serial(), self.channel(), interval)
    }

    /// Stop background polling.
    pub fn stop_polling(&self) -> Result<()> {
        self.library.stop_polling(self.serial(), self.channel())
    }

    // Hardware info

    /// Read and decode hardware information.
    pub fn hardware_info(&self) -> Result<HardwareInfo> {
        let mut buffers = HardwareInfoBuffers::default();
        Error::check(
            self.library
                .hardware_info(self.serial(), self.channel(), &mut buffers)?,
        )?;
        Ok(HardwareInfo::from_buffers(&buffers))
    }

    /// Model number from hardware information.
    pub fn model_number(&self) -> Result<heapless::String<{ crate::binding::MODEL_NUMBER_CAPACITY }>> {
        Ok(self.hardware_info()?.model_number)
    }

    // Status

    /// Last polled status bits.
    pub fn status_bits(&self) -> Result<StatusBits> {
        Ok(StatusBits::from_bits(
            self.library.status_bits(self.serial(), self.channel())?,
        ))
    }

    // Channel enable

    /// Whether the channel is enabled, from the last polled status bits.
    pub fn is_channel_enabled(&self) -> Result<bool> {
        Ok(self.status_bits()?.is_channel_enabled())
    }

    /// Enable or disable the channel.
    pub fn set_channel_enabled(&self, enabled: bool) -> Result<()> {
        let status = if enabled {
            self.library.enable_channel(self.serial(), self.channel())?
        } else {
            self.library.disable_channel(self.serial(), self.channel())?
        };
        Error::check(status)
    }

    // Travel and rotation modes

    /// Current travel mode.
    pub fn travel_mode(&self) -> Result<TravelMode> {
        Ok(TravelMode::from_raw(
            self.library.travel_mode(self.serial(), self.channel())?,
        ))
    }

    /// Set the travel mode.
    pub fn set_travel_mode(&self, mode: TravelMode) -> Result<()> {
        Error::check(
            self.library
                .set_travel_mode(self.serial(), self.channel(), mode.raw())?,
        )
    }

    /// Restore the default rotation modes.
    pub fn reset_rotation_modes(&self) -> Result<()> {
        Error::check(self.library.reset_rotation_modes(self.serial(), self.channel())?)
    }

    /// Set rotation movement mode and direction.
    pub fn set_rotation_modes(&self, mode: MovementMode, direction: MovementDirection) -> Result<()> {
        Error::check(self.library.set_rotation_modes(
            self.serial(),
            self.channel(),
            mode.raw(),
            direction.raw(),
        )?)
    }

    // Position

    /// Last polled position.
    pub fn position(&self) -> Result<i32> {
        self.library.position(self.serial(), self.channel())
    }

    /// Last polled position counter.
    pub fn position_counter(&self) -> Result<i64> {
        self.library.position_counter(self.serial(), self.channel())
    }

    /// Start an absolute move in device units.
    pub fn move_to_position(&self, index: i32) -> Result<()> {
        Error::check(
            self.library
                .move_to_position(self.serial(), self.channel(), index)?,
        )
    }

    // Homing

    /// Whether the device supports homing.
    pub fn can_home(&self) -> Result<bool> {
        self.library.can_home(self.serial(), self.channel())
    }

    /// Start homing.
    pub fn home(&self) -> Result<()> {
        Error::check(self.library.home(self.serial(), self.channel())?)
    }

    // Vendor unit conversions. Reported to fail on several controllers, so
    // the stage does its own arithmetic instead.

    /// Device units to a real value via the vendor library.
    pub fn device_unit_to_real(&self, device_units: i32, unit_type: UnitType) -> Result<f64> {
        let (status, real) = self.library.real_value_from_device_unit(
            self.serial(),
            self.channel(),
            device_units,
            unit_type.raw(),
        )?;
        Error::check(status)?;
        Ok(real)
    }

    /// Real value to device units via the vendor library.
    pub fn real_to_device_unit(&self, real_value: f64, unit_type: UnitType) -> Result<i32> {
        let (status, units) = self.library.device_unit_from_real_value(
            self.serial(),
            self.channel(),
            real_value,
            unit_type.raw(),
        )?;
        Error::check(status)?;
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Call, FakeLibrary};

    const SERIAL: &str = "70000001";

    fn drive(lib: &FakeLibrary) -> MotorDrive<'_, FakeLibrary> {
        MotorDrive::new(lib, DeviceAddress::new(SERIAL, 1).unwrap())
    }

    #[test]
    fn test_status_codes_pass_through() {
        let lib = FakeLibrary::with_device(SERIAL);
        lib.script(|d| d.move_status = 38);
        assert_eq!(drive(&lib).move_to_position(10), Err(Error::Hardware(38)));
        assert_eq!(lib.count(Call::MoveToPosition(10)), 1);
    }

    #[test]
    fn test_enable_toggles_status() {
        let lib = FakeLibrary::with_device(SERIAL);
        let d = drive(&lib);
        assert_eq!(d.is_channel_enabled(), Ok(false));
        d.set_channel_enabled(true).unwrap();
        assert_eq!(d.is_channel_enabled(), Ok(true));
        d.set_channel_enabled(false).unwrap();
        assert_eq!(lib.count(Call::DisableChannel), 1);
    }

    #[test]
    fn test_rotation_modes() {
        let lib = FakeLibrary::with_device(SERIAL);
        let d = drive(&lib);
        d.set_rotation_modes(MovementMode::RotationalWrapping, MovementDirection::Forwards)
            .unwrap();
        assert_eq!(lib.device().rotation_modes, (2, 1));
        d.set_travel_mode(TravelMode::Rotational).unwrap();
        assert_eq!(d.travel_mode(), Ok(TravelMode::Rotational));
    }

    #[test]
    fn test_vendor_conversion_errors_surface() {
        let lib = FakeLibrary::with_device(SERIAL);
        lib.script(|d| d.conversion_status = 34);
        assert_eq!(
            drive(&lib).device_unit_to_real(100, UnitType::Distance),
            Err(Error::Hardware(34))
        );
    }

    #[test]
    fn test_negative_channel_count_is_an_error() {
        let lib = FakeLibrary::with_device(SERIAL);
        lib.script(|d| d.channels = -3);
        assert_eq!(drive(&lib).channel_count(), Err(Error::Hardware(-3)));
        lib.script(|d| d.channels = 2);
        assert_eq!(drive(&lib).channel_count(), Ok(2));
    }

    #[test]
    fn test_model_number() {
        let lib = FakeLibrary::with_device(SERIAL);
        assert_eq!(drive(&lib).model_number().unwrap().as_str(), "BSC201");
    }
}
