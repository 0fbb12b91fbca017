//! Shared connection to one controller.
//!
//! Every channel on a controller goes through the same connection. Stages
//! borrow it; the connection outlives them and closes the controller when it
//! is dropped.

use heapless::String;

use crate::binding::MotionControlLibrary;
use crate::drive::{DeviceAddress, MotorDrive, SERIAL_NUMBER_CAPACITY};
use crate::error::{Error, Result};

/// An opened (or failed-to-open) controller.
pub struct DeviceConnection<'a, L: MotionControlLibrary> {
    library: &'a L,
    serial_number: String<SERIAL_NUMBER_CAPACITY>,
    error: Option<Error>,
}

impl<'a, L: MotionControlLibrary> DeviceConnection<'a, L> {
    /// Open the controller with `serial_number`.
    ///
    /// Failure is recorded rather than returned, so a stage can still report
    /// a name and a specific error code for a device that did not open.
    pub fn open(library: &'a L, serial_number: &str) -> Self {
        let (serial, error) = match DeviceAddress::new(serial_number, 0) {
            Ok(address) => {
                let error = Self::open_address(library, &address).err();
                (String::try_from(address.serial_number()).unwrap_or_default(), error)
            }
            Err(e) => (String::new(), Some(e)),
        };

        match &error {
            None => info!("opened controller {}", serial.as_str()),
            Some(e) => warn!("failed to open controller {}: code {}", serial_number, e.code()),
        }

        Self {
            library,
            serial_number: serial,
            error,
        }
    }

    fn open_address(library: &'a L, address: &DeviceAddress) -> Result<()> {
        if !library.is_available() {
            return Err(Error::LibraryUnavailable);
        }
        MotorDrive::new(library, address.clone())
            .open()
            .map_err(|e| match e {
                Error::Hardware(code) => Error::Connection(code),
                other => other,
            })
    }

    /// Whether the controller opened.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Why the controller did not open.
    #[inline]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Fail with the recorded error if the controller did not open.
    pub fn check(&self) -> Result<()> {
        match &self.error {
            None => Ok(()),
            Some(e) => Err(e.clone()),
        }
    }

    /// Controller serial number.
    #[inline]
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Shared library binding.
    #[inline]
    pub fn library(&self) -> &'a L {
        self.library
    }

    /// Drive for `channel` on this controller.
    ///
    /// # Errors
    ///
    /// Returns the recorded open error if the connection is invalid.
    pub fn drive(&self, channel: u16) -> Result<MotorDrive<'a, L>> {
        self.check()?;
        let address = DeviceAddress::new(&self.serial_number, channel)?;
        Ok(MotorDrive::new(self.library, address))
    }

    /// Number of channels on the controller.
    pub fn channel_count(&self) -> Result<u16> {
        self.drive(0)?.channel_count()
    }
}

impl<'a, L: MotionControlLibrary> Drop for DeviceConnection<'a, L> {
    fn drop(&mut self) {
        if self.is_valid() {
            let _ = self.library.close(&self.serial_number);
            debug!("closed controller {}", self.serial_number.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Call, FakeLibrary};

    #[test]
    fn test_open_and_close() {
        let lib = FakeLibrary::with_device("70000001");
        {
            let conn = DeviceConnection::open(&lib, "70000001");
            assert!(conn.is_valid());
            assert_eq!(conn.channel_count(), Ok(1));
        }
        assert_eq!(lib.count(Call::Close), 1);
        assert!(!lib.device().open);
    }

    #[test]
    fn test_missing_device() {
        let lib = FakeLibrary::with_device("70000001");
        let conn = DeviceConnection::open(&lib, "00000000");
        assert_eq!(conn.error(), Some(&Error::Connection(2)));
        assert!(conn.drive(0).is_err());
        drop(conn);
        assert_eq!(lib.count(Call::Close), 0);
    }

    #[test]
    fn test_unavailable_library() {
        let lib = FakeLibrary::unavailable();
        let conn = DeviceConnection::open(&lib, "70000001");
        assert_eq!(conn.check(), Err(Error::LibraryUnavailable));
    }
}
