//! Unit tests for host error codes and messages.

use kinesis_stage::codes::{error_text, HARDWARE_ERROR_OFFSET};
use kinesis_stage::Error;

/// Vendor codes are offset and keep their message.
#[test]
fn test_hardware_codes_are_offset() {
    let err = Error::Hardware(37);
    assert_eq!(err.code(), HARDWARE_ERROR_OFFSET + 37);
    assert_eq!(error_text(err.code()), Some("Device is not homed"));
}

/// Connection errors share the vendor code space.
#[test]
fn test_connection_code() {
    let err = Error::Connection(2);
    assert_eq!(error_text(err.code()), Some("Device not found"));
}

/// Every crate error has a distinct message.
#[test]
fn test_local_codes_have_messages() {
    let errors = [Error::LibraryUnavailable, Error::Unsupported, Error::NotInitialized];
    for err in errors {
        assert!(error_text(err.code()).is_some(), "no text for {:?}", err);
    }
    assert_ne!(Error::Unsupported.code(), Error::NotInitialized.code());
}

/// Unknown codes have no message.
#[test]
fn test_unknown_code() {
    assert_eq!(error_text(HARDWARE_ERROR_OFFSET + 9999), None);
    assert_eq!(error_text(-1), None);
}
