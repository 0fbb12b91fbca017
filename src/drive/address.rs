//! Device addressing.

use core::fmt;

use heapless::String;

use crate::config::validate_serial_number;
use crate::error::{ConfigError, Error, Result};

/// Longest serial number accepted.
pub const SERIAL_NUMBER_CAPACITY: usize = 16;

/// Highest channel the vendor library can address.
pub const MAX_CHANNEL: u16 = i16::MAX as u16;

/// Serial number plus channel: one controllable axis.
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress {
    serial_number: String<SERIAL_NUMBER_CAPACITY>,
    channel: u16,
}

impl DeviceAddress {
    /// Create an address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSerialNumber` if the serial number is
    /// empty, not numeric, or longer than [`SERIAL_NUMBER_CAPACITY`], and
    /// `ConfigError::InvalidChannel` if `channel` exceeds [`MAX_CHANNEL`].
    pub fn new(serial_number: &str, channel: u16) -> Result<Self> {
        validate_serial_number(serial_number)?;
        if channel > MAX_CHANNEL {
            return Err(Error::Config(ConfigError::InvalidChannel(channel)));
        }
        let serial_number = String::try_from(serial_number).map_err(|_| {
            Error::Config(ConfigError::InvalidSerialNumber(
                String::try_from(&serial_number[..serial_number.len().min(32)]).unwrap_or_default(),
            ))
        })?;
        Ok(Self {
            serial_number,
            channel,
        })
    }

    /// Controller serial number.
    #[inline]
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Channel index.
    #[inline]
    pub fn channel(&self) -> u16 {
        self.channel
    }
}

impl fmt::Display for DeviceAddress {
    /// `serial` for channel 0, `serial-channel` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.channel > 0 {
            write!(f, "{}-{}", self.serial_number, self.channel)
        } else {
            write!(f, "{}", self.serial_number)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let addr = DeviceAddress::new("70000001", 2).unwrap();
        assert_eq!(addr.serial_number(), "70000001");
        let mut s: String<32> = String::new();
        core::fmt::write(&mut s, format_args!("{}", addr)).unwrap();
        assert_eq!(s.as_str(), "70000001-2");
    }

    #[test]
    fn test_rejects_long_serial() {
        assert!(DeviceAddress::new("12345678901234567", 0).is_err());
        assert!(DeviceAddress::new("", 0).is_err());
    }

    #[test]
    fn test_rejects_channel_out_of_vendor_range() {
        assert!(DeviceAddress::new("70000001", MAX_CHANNEL).is_ok());
        assert_eq!(
            DeviceAddress::new("70000001", MAX_CHANNEL + 1),
            Err(Error::Config(ConfigError::InvalidChannel(32_768)))
        );
    }
}
