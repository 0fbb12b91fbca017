//! Hardware information decoded from the fixed-size vendor buffers.

use heapless::String;

use crate::binding::{HardwareInfoBuffers, MODEL_NUMBER_CAPACITY, NOTES_CAPACITY};

/// Controller identification.
///
/// Text fields hold at most `capacity - 1` bytes of the vendor buffer: the
/// text ends at the first NUL, or one byte short of capacity if none. Bytes
/// that are not valid UTF-8 end the text as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareInfo {
    /// Model number, e.g. `BSC201`.
    pub model_number: String<MODEL_NUMBER_CAPACITY>,
    /// Hardware type code.
    pub hardware_type: u16,
    /// Number of channels.
    pub channel_count: u16,
    /// Free-form notes.
    pub notes: String<NOTES_CAPACITY>,
    /// Packed firmware version.
    pub firmware_version: u32,
    /// Hardware revision.
    pub hardware_version: u16,
    /// Modification state.
    pub modification_state: u16,
}

impl HardwareInfo {
    /// Decode the raw buffers.
    pub fn from_buffers(buffers: &HardwareInfoBuffers) -> Self {
        Self {
            model_number: decode_text(&buffers.model_number),
            hardware_type: buffers.hardware_type,
            channel_count: buffers.channel_count,
            notes: decode_text(&buffers.notes),
            firmware_version: buffers.firmware_version,
            hardware_version: buffers.hardware_version,
            modification_state: buffers.modification_state,
        }
    }

    /// Firmware version as (major, minor, patch).
    pub fn firmware_version_parts(&self) -> (u8, u8, u16) {
        let v = self.firmware_version;
        ((v >> 24) as u8, (v >> 16) as u8, v as u16)
    }
}

fn decode_text<const N: usize>(raw: &[u8; N]) -> String<N> {
    let limit = N.saturating_sub(1);
    let end = raw[..limit].iter().position(|&b| b == 0).unwrap_or(limit);
    let text = match core::str::from_utf8(&raw[..end]) {
        Ok(text) => text,
        // valid_up_to is always a char boundary
        Err(e) => core::str::from_utf8(&raw[..e.valid_up_to()]).unwrap_or_default(),
    };
    String::try_from(text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stops_at_nul() {
        let mut raw = [0u8; 8];
        raw[..6].copy_from_slice(b"BSC201");
        assert_eq!(decode_text(&raw).as_str(), "BSC201");
    }

    #[test]
    fn test_decode_unterminated() {
        let raw = *b"ABCDEFGH";
        assert_eq!(decode_text(&raw).as_str(), "ABCDEFG");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut raw = [0u8; 8];
        raw[..4].copy_from_slice(&[b'K', b'S', 0xFF, b'T']);
        assert_eq!(decode_text(&raw).as_str(), "KS");
    }

    #[test]
    fn test_firmware_parts() {
        let info = HardwareInfo::from_buffers(&HardwareInfoBuffers {
            firmware_version: 0x0102_0003,
            ..HardwareInfoBuffers::default()
        });
        assert_eq!(info.firmware_version_parts(), (1, 2, 3));
    }
}
