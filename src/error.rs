//! Error types for kinesis-stage.
//!
//! Vendor status codes are carried verbatim; [`Error::code`] folds every error
//! into the numeric space the host uses to look up messages (see
//! [`crate::codes`]).

use core::fmt;

use crate::codes;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all kinesis-stage operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The vendor motion-control library could not be loaded.
    LibraryUnavailable,
    /// The library loaded but does not export the named entry point.
    SymbolNotFound(heapless::String<64>),
    /// Opening the device failed or the connection is invalid.
    Connection(i16),
    /// A vendor call returned a nonzero status code.
    Hardware(i16),
    /// The device does not support the requested operation.
    Unsupported,
    /// The stage has not been initialized.
    NotInitialized,
    /// Configuration parsing or validation error.
    Config(ConfigError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Stage name not found in configuration
    StageNotFound(heapless::String<32>),
    /// Serial number is empty, too long or not numeric
    InvalidSerialNumber(heapless::String<32>),
    /// Channel beyond the range the vendor library addresses
    InvalidChannel(u16),
    /// Scale factor must be finite and > 0
    InvalidScale(f64),
    /// Polling interval out of range
    InvalidPollingInterval(u32),
    /// A required builder field was not supplied
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

impl Error {
    /// Numeric code in the host's error space.
    ///
    /// Vendor and connection codes are offset by
    /// [`codes::HARDWARE_ERROR_OFFSET`]; the remaining variants map to the
    /// crate's own codes.
    pub fn code(&self) -> i32 {
        match self {
            Error::Hardware(code) | Error::Connection(code) => {
                codes::HARDWARE_ERROR_OFFSET + i32::from(*code)
            }
            Error::LibraryUnavailable => codes::ERR_LIBRARY_UNAVAILABLE,
            Error::SymbolNotFound(_) => codes::ERR_SYMBOL_NOT_FOUND,
            Error::Unsupported => codes::ERR_UNSUPPORTED_COMMAND,
            Error::NotInitialized => codes::ERR_NOT_INITIALIZED,
            Error::Config(_) => codes::ERR_INVALID_CONFIG,
        }
    }

    /// Whether this is the "not supported" outcome rather than a fault.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported)
    }

    /// Convert a vendor status code into a result.
    #[inline]
    pub(crate) fn check(status: i16) -> Result<()> {
        if status == 0 {
            Ok(())
        } else {
            Err(Error::Hardware(status))
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LibraryUnavailable => write!(f, "Motion control library is not available"),
            Error::SymbolNotFound(name) => {
                write!(f, "Motion control library does not export '{}'", name)
            }
            Error::Connection(code) | Error::Hardware(code) => {
                match codes::vendor_error_text(*code) {
                    Some(text) => write!(f, "{} (code {})", text, code),
                    None => write!(f, "Unknown device error (code {})", code),
                }
            }
            Error::Unsupported => write!(f, "Operation not supported by this device"),
            Error::NotInitialized => write!(f, "Stage not initialized"),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::StageNotFound(name) => write!(f, "Stage '{}' not found", name),
            ConfigError::InvalidSerialNumber(serial) => {
                write!(f, "Invalid serial number '{}'", serial)
            }
            ConfigError::InvalidChannel(channel) => {
                write!(f, "Invalid channel {}. Must be at most {}", channel, i16::MAX)
            }
            ConfigError::InvalidScale(v) => {
                write!(f, "Invalid device units scale: {}. Must be finite and > 0", v)
            }
            ConfigError::InvalidPollingInterval(ms) => {
                write!(f, "Invalid polling interval: {} ms. Must be 1-10000", ms)
            }
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardware_codes_are_offset() {
        assert_eq!(
            Error::Hardware(44).code(),
            codes::HARDWARE_ERROR_OFFSET + 44
        );
        assert_eq!(
            Error::Connection(2).code(),
            codes::HARDWARE_ERROR_OFFSET + 2
        );
    }

    #[test]
    fn test_check_status() {
        assert!(Error::check(0).is_ok());
        assert_eq!(Error::check(33), Err(Error::Hardware(33)));
    }
}
