//! Host error-code space.
//!
//! Vendor status codes are shifted by [`HARDWARE_ERROR_OFFSET`] so they never
//! collide with the host's generic device codes or with the crate's own codes
//! below the offset.

/// Offset added to vendor status codes (and connection errors) before they are
/// handed to the host.
pub const HARDWARE_ERROR_OFFSET: i32 = 20_000;

/// The vendor library failed to load.
pub const ERR_LIBRARY_UNAVAILABLE: i32 = 10_001;
/// The vendor library lacks an entry point.
pub const ERR_SYMBOL_NOT_FOUND: i32 = 10_002;
/// Operation attempted before initialization.
pub const ERR_NOT_INITIALIZED: i32 = 10_003;
/// Configuration could not be parsed or failed validation.
pub const ERR_INVALID_CONFIG: i32 = 10_004;
/// The device does not support the requested command.
pub const ERR_UNSUPPORTED_COMMAND: i32 = 10_005;

/// Native status codes of the vendor motion-control library.
pub const VENDOR_ERROR_CODES: &[(i16, &str)] = &[
    // Communication layer
    (1, "Invalid USB handle"),
    (2, "Device not found"),
    (3, "Device not opened"),
    (4, "USB I/O error"),
    (5, "Insufficient resources"),
    (6, "Invalid parameter"),
    (7, "Device no longer present"),
    (8, "Incorrect device"),
    // Library loading
    (16, "Device library not loaded"),
    (17, "No functions available in device library"),
    (18, "Function not available in device library"),
    (19, "Bad function pointer"),
    (20, "Generic function failure"),
    (21, "Specific function failure"),
    // Device
    (32, "Device already open"),
    (33, "No response from device"),
    (34, "Function not implemented for device"),
    (35, "Device reported a fault"),
    (36, "Invalid operation"),
    (37, "Device is not homed"),
    (38, "Invalid position"),
    (39, "Invalid velocity parameter"),
    (40, "Device is disconnecting"),
    (41, "Device firmware error"),
    (42, "Device initialization failure"),
    (43, "Invalid channel"),
    (44, "Device cannot home"),
    (45, "Jog is set to continuous mode"),
    (46, "Motor parameters not available"),
    (47, "Command temporarily unavailable"),
];

/// Message for a native vendor status code.
pub fn vendor_error_text(code: i16) -> Option<&'static str> {
    VENDOR_ERROR_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, text)| *text)
}

/// Message for a code in the host's error space.
///
/// Returns `None` for codes this crate never produces.
pub fn error_text(code: i32) -> Option<&'static str> {
    match code {
        ERR_LIBRARY_UNAVAILABLE => Some("Motion control library is not available"),
        ERR_SYMBOL_NOT_FOUND => Some("Motion control library is missing a required function"),
        ERR_NOT_INITIALIZED => Some("Stage not initialized"),
        ERR_INVALID_CONFIG => Some("Invalid stage configuration"),
        ERR_UNSUPPORTED_COMMAND => Some("Operation not supported by this device"),
        c if c > HARDWARE_ERROR_OFFSET => {
            i16::try_from(c - HARDWARE_ERROR_OFFSET)
                .ok()
                .and_then(vendor_error_text)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_lookup() {
        assert_eq!(
            error_text(HARDWARE_ERROR_OFFSET + 44),
            Some("Device cannot home")
        );
        assert_eq!(error_text(HARDWARE_ERROR_OFFSET + 9), None);
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, (a, _)) in VENDOR_ERROR_CODES.iter().enumerate() {
            for (b, _) in &VENDOR_ERROR_CODES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
