//! Status bits reported by the controller.
//!
//! Refreshed only at the polling cadence; reading them never talks to the
//! hardware.

use core::ops::BitOr;

/// Status bitmask of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusBits(u32);

impl StatusBits {
    /// Clockwise hardware limit switch.
    pub const CW_HARDWARE_LIMIT: Self = Self(0x0000_0001);
    /// Counter-clockwise hardware limit switch.
    pub const CCW_HARDWARE_LIMIT: Self = Self(0x0000_0002);
    /// Clockwise software limit.
    pub const CW_SOFTWARE_LIMIT: Self = Self(0x0000_0004);
    /// Counter-clockwise software limit.
    pub const CCW_SOFTWARE_LIMIT: Self = Self(0x0000_0008);
    /// Moving clockwise.
    pub const MOVING_CW: Self = Self(0x0000_0010);
    /// Moving counter-clockwise.
    pub const MOVING_CCW: Self = Self(0x0000_0020);
    /// Jogging clockwise.
    pub const JOGGING_CW: Self = Self(0x0000_0040);
    /// Jogging counter-clockwise.
    pub const JOGGING_CCW: Self = Self(0x0000_0080);
    /// Motor connected.
    pub const CONNECTED: Self = Self(0x0000_0100);
    /// Homing in progress.
    pub const HOMING: Self = Self(0x0000_0200);
    /// Homing completed.
    pub const HOMED: Self = Self(0x0000_0400);
    /// Interlock state.
    pub const INTERLOCK: Self = Self(0x0000_1000);
    /// Channel enabled.
    pub const CHANNEL_ENABLED: Self = Self(0x8000_0000);

    /// Bits that mean the axis is in motion.
    pub const MOTION: Self = Self(
        Self::MOVING_CW.0
            | Self::MOVING_CCW.0
            | Self::JOGGING_CW.0
            | Self::JOGGING_CCW.0
            | Self::HOMING.0,
    );

    /// Wrap a raw bitmask.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bitmask.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether any bit of `other` is set.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether every bit of `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Moving, jogging or homing.
    #[inline]
    pub const fn is_moving(self) -> bool {
        self.intersects(Self::MOTION)
    }

    /// Channel output enabled.
    #[inline]
    pub const fn is_channel_enabled(self) -> bool {
        self.contains(Self::CHANNEL_ENABLED)
    }
}

impl BitOr for StatusBits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl From<u32> for StatusBits {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_mask() {
        assert_eq!(StatusBits::MOTION.bits(), 0x2F0);
        assert!(StatusBits::HOMING.is_moving());
        assert!(!(StatusBits::HOMED | StatusBits::CONNECTED).is_moving());
    }

    #[test]
    fn test_channel_enabled() {
        assert!(StatusBits::from_bits(0x8000_0100).is_channel_enabled());
        assert!(!StatusBits::from_bits(0x0000_0100).is_channel_enabled());
    }
}
