//! In-memory stand-in for the vendor library.
//!
//! A single scripted device answers for every channel of every attached
//! serial number. Moves complete instantly; status bits other than "channel
//! enabled" change only when the test scripts them.

use core::cell::{Ref, RefCell};

use heapless::{String, Vec};

use crate::drive::StatusBits;
use crate::error::{Error, Result};

use super::{HardwareInfoBuffers, MotionControlLibrary};

/// Status returned when opening a serial number that is not attached.
pub const DEVICE_NOT_FOUND: i16 = 2;

/// Maximum number of calls kept in the log.
pub const CALL_LOG_CAPACITY: usize = 256;

/// A recorded library call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// `open`
    Open,
    /// `close`
    Close,
    /// `channel_count`
    ChannelCount,
    /// `request_settings`
    RequestSettings,
    /// `request_status_bits`
    RequestStatusBits,
    /// `request_position`
    RequestPosition,
    /// `start_polling` with its interval
    StartPolling(i32),
    /// `stop_polling`
    StopPolling,
    /// `hardware_info`
    HardwareInfo,
    /// `status_bits`
    StatusBits,
    /// `enable_channel`
    EnableChannel,
    /// `disable_channel`
    DisableChannel,
    /// `travel_mode`
    TravelMode,
    /// `set_travel_mode`
    SetTravelMode(i32),
    /// `reset_rotation_modes`
    ResetRotationModes,
    /// `set_rotation_modes`
    SetRotationModes(i32, i32),
    /// `position`
    Position,
    /// `position_counter`
    PositionCounter,
    /// `move_to_position` with its target
    MoveToPosition(i32),
    /// `can_home`
    CanHome,
    /// `home`
    Home,
    /// `real_value_from_device_unit`
    RealValueFromDeviceUnit,
    /// `device_unit_from_real_value`
    DeviceUnitFromRealValue,
}

/// Scriptable device state.
#[derive(Debug, Clone)]
pub struct FakeDevice {
    /// Serial numbers that open successfully.
    pub attached: Vec<String<16>, 4>,
    /// Whether `open` has succeeded and `close` has not been called since.
    pub open: bool,
    /// Reported channel count.
    pub channels: i16,
    /// Status bits, excluding the channel-enabled bit.
    pub status_bits: u32,
    /// Channel enabled state.
    pub channel_enabled: bool,
    /// Position counter; moves set it to their target.
    pub position_counter: i64,
    /// `can_home` answer.
    pub can_home: bool,
    /// `start_polling` answer.
    pub polling_ok: bool,
    /// Interval of the active polling session.
    pub polling_interval_ms: Option<i32>,
    /// Status of `request_position`.
    pub request_position_status: i16,
    /// Status of `request_status_bits`.
    pub request_status_bits_status: i16,
    /// Status of `enable_channel` / `disable_channel`.
    pub enable_status: i16,
    /// Status of `move_to_position`.
    pub move_status: i16,
    /// Status of `home`.
    pub home_status: i16,
    /// Status of the unit conversion calls.
    pub conversion_status: i16,
    /// Raw travel mode.
    pub travel_mode: i32,
    /// Raw rotation mode and direction.
    pub rotation_modes: (i32, i32),
    /// Model number reported by `hardware_info`.
    pub model_number: &'static str,
    /// Notes reported by `hardware_info`.
    pub notes: &'static str,
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self {
            attached: Vec::new(),
            open: false,
            channels: 1,
            status_bits: 0,
            channel_enabled: false,
            position_counter: 0,
            can_home: true,
            polling_ok: true,
            polling_interval_ms: None,
            request_position_status: 0,
            request_status_bits_status: 0,
            enable_status: 0,
            move_status: 0,
            home_status: 0,
            conversion_status: 0,
            travel_mode: 1,
            rotation_modes: (0, 0),
            model_number: "BSC201",
            notes: "Fake stepper controller",
        }
    }
}

/// Scripted [`MotionControlLibrary`] with a call log.
#[derive(Debug)]
pub struct FakeLibrary {
    available: bool,
    device: RefCell<FakeDevice>,
    calls: RefCell<Vec<Call, CALL_LOG_CAPACITY>>,
}

impl FakeLibrary {
    /// Library with one attached controller.
    pub fn with_device(serial: &str) -> Self {
        let mut device = FakeDevice::default();
        if let Ok(s) = String::try_from(serial) {
            let _ = device.attached.push(s);
        }
        Self {
            available: true,
            device: RefCell::new(device),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Library that failed to load.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            device: RefCell::new(FakeDevice::default()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Modify the device state.
    pub fn script<F: FnOnce(&mut FakeDevice)>(&self, f: F) {
        f(&mut self.device.borrow_mut());
    }

    /// Current device state.
    pub fn device(&self) -> Ref<'_, FakeDevice> {
        self.device.borrow()
    }

    /// Recorded calls, oldest first.
    pub fn calls(&self) -> Vec<Call, CALL_LOG_CAPACITY> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls equal to `call`.
    pub fn count(&self, call: Call) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) -> Result<()> {
        if !self.available {
            return Err(Error::LibraryUnavailable);
        }
        // A full log drops further calls.
        let _ = self.calls.borrow_mut().push(call);
        Ok(())
    }

    fn with<T>(&self, call: Call, f: impl FnOnce(&mut FakeDevice) -> T) -> Result<T> {
        self.record(call)?;
        Ok(f(&mut self.device.borrow_mut()))
    }
}

fn copy_text(dst: &mut [u8], text: &str) {
    let n = text.len().min(dst.len().saturating_sub(1));
    dst[..n].copy_from_slice(&text.as_bytes()[..n]);
    for b in &mut dst[n..] {
        *b = 0;
    }
}

impl MotionControlLibrary for FakeLibrary {
    fn is_available(&self) -> bool {
        self.available
    }

    fn open(&self, serial: &str) -> Result<i16> {
        self.with(Call::Open, |d| {
            if d.attached.iter().any(|s| s.as_str() == serial) {
                d.open = true;
                0
            } else {
                DEVICE_NOT_FOUND
            }
        })
    }

    fn close(&self, _serial: &str) -> Result<()> {
        self.with(Call::Close, |d| d.open = false)
    }

    fn channel_count(&self, _serial: &str) -> Result<i16> {
        self.with(Call::ChannelCount, |d| d.channels)
    }

    fn request_settings(&self, _serial: &str, _channel: u16) -> Result<i16> {
        self.with(Call::RequestSettings, |_| 0)
    }

    fn request_status_bits(&self, _serial: &str, _channel: u16) -> Result<i16> {
        self.with(Call::RequestStatusBits, |d| d.request_status_bits_status)
    }

    fn request_position(&self, _serial: &str, _channel: u16) -> Result<i16> {
        self.with(Call::RequestPosition, |d| d.request_position_status)
    }

    fn start_polling(&self, _serial: &str, _channel: u16, interval_ms: i32) -> Result<bool> {
        self.with(Call::StartPolling(interval_ms), |d| {
            if d.polling_ok {
                d.polling_interval_ms = Some(interval_ms);
            }
            d.polling_ok
        })
    }

    fn stop_polling(&self, _serial: &str, _channel: u16) -> Result<()> {
        self.with(Call::StopPolling, |d| d.polling_interval_ms = None)
    }

    fn hardware_info(
        &self,
        _serial: &str,
        _channel: u16,
        out: &mut HardwareInfoBuffers,
    ) -> Result<i16> {
        self.with(Call::HardwareInfo, |d| {
            copy_text(&mut out.model_number, d.model_number);
            copy_text(&mut out.notes, d.notes);
            out.channel_count = u16::try_from(d.channels).unwrap_or(0);
            out.hardware_type = 44;
            out.firmware_version = 0x0001_0203;
            out.hardware_version = 1;
            out.modification_state = 0;
            0
        })
    }

    fn status_bits(&self, _serial: &str, _channel: u16) -> Result<u32> {
        self.with(Call::StatusBits, |d| {
            if d.channel_enabled {
                d.status_bits | StatusBits::CHANNEL_ENABLED.bits()
            } else {
                d.status_bits & !StatusBits::CHANNEL_ENABLED.bits()
            }
        })
    }

    fn enable_channel(&self, _serial: &str, _channel: u16) -> Result<i16> {
        self.with(Call::EnableChannel, |d| {
            if d.enable_status == 0 {
                d.channel_enabled = true;
            }
            d.enable_status
        })
    }

    fn disable_channel(&self, _serial: &str, _channel: u16) -> Result<i16> {
        self.with(Call::DisableChannel, |d| {
            if d.enable_status == 0 {
                d.channel_enabled = false;
            }
            d.enable_status
        })
    }

    fn travel_mode(&self, _serial: &str, _channel: u16) -> Result<i32> {
        self.with(Call::TravelMode, |d| d.travel_mode)
    }

    fn set_travel_mode(&self, _serial: &str, _channel: u16, mode: i32) -> Result<i16> {
        self.with(Call::SetTravelMode(mode), |d| {
            d.travel_mode = mode;
            0
        })
    }

    fn reset_rotation_modes(&self, _serial: &str, _channel: u16) -> Result<i16> {
        self.with(Call::ResetRotationModes, |d| {
            d.rotation_modes = (0, 0);
            0
        })
    }

    fn set_rotation_modes(
        &self,
        _serial: &str,
        _channel: u16,
        mode: i32,
        direction: i32,
    ) -> Result<i16> {
        self.with(Call::SetRotationModes(mode, direction), |d| {
            d.rotation_modes = (mode, direction);
            0
        })
    }

    fn position(&self, _serial: &str, _channel: u16) -> Result<i32> {
        self.with(Call::Position, |d| {
            i32::try_from(d.position_counter).unwrap_or(if d.position_counter < 0 {
                i32::MIN
            } else {
                i32::MAX
            })
        })
    }

    fn position_counter(&self, _serial: &str, _channel: u16) -> Result<i64> {
        self.with(Call::PositionCounter, |d| d.position_counter)
    }

    fn move_to_position(&self, _serial: &str, _channel: u16, index: i32) -> Result<i16> {
        self.with(Call::MoveToPosition(index), |d| {
            if d.move_status == 0 {
                d.position_counter = i64::from(index);
            }
            d.move_status
        })
    }

    fn can_home(&self, _serial: &str, _channel: u16) -> Result<bool> {
        self.with(Call::CanHome, |d| d.can_home)
    }

    fn home(&self, _serial: &str, _channel: u16) -> Result<i16> {
        self.with(Call::Home, |d| {
            if d.home_status == 0 {
                d.position_counter = 0;
            }
            d.home_status
        })
    }

    fn real_value_from_device_unit(
        &self,
        _serial: &str,
        _channel: u16,
        device_units: i32,
        _unit_type: i32,
    ) -> Result<(i16, f64)> {
        self.with(Call::RealValueFromDeviceUnit, |d| {
            (d.conversion_status, f64::from(device_units))
        })
    }

    fn device_unit_from_real_value(
        &self,
        _serial: &str,
        _channel: u16,
        real_value: f64,
        _unit_type: i32,
    ) -> Result<(i16, i32)> {
        self.with(Call::DeviceUnitFromRealValue, |d| {
            (d.conversion_status, libm::round(real_value) as i32)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_unknown_serial() {
        let lib = FakeLibrary::with_device("70000001");
        assert_eq!(lib.open("00000000"), Ok(DEVICE_NOT_FOUND));
        assert_eq!(lib.open("70000001"), Ok(0));
        assert!(lib.device().open);
    }

    #[test]
    fn test_unavailable_records_nothing() {
        let lib = FakeLibrary::unavailable();
        assert_eq!(lib.open("70000001"), Err(Error::LibraryUnavailable));
        assert!(lib.calls().is_empty());
    }

    #[test]
    fn test_enable_sets_status_bit() {
        let lib = FakeLibrary::with_device("70000001");
        assert_eq!(lib.status_bits("70000001", 0), Ok(0));
        lib.enable_channel("70000001", 0).unwrap();
        assert_eq!(
            lib.status_bits("70000001", 0),
            Ok(StatusBits::CHANNEL_ENABLED.bits())
        );
        assert_eq!(lib.count(Call::StatusBits), 2);
    }

    #[test]
    fn test_hardware_info_truncates_model_number() {
        let lib = FakeLibrary::with_device("70000001");
        lib.script(|d| d.model_number = "TOOLONGMODEL");
        let mut out = HardwareInfoBuffers::default();
        lib.hardware_info("70000001", 0, &mut out).unwrap();
        assert_eq!(&out.model_number, b"TOOLONG\0");
    }
}
