//! Stage lifecycle and motion tracking state.
//!
//! Status bits are only as fresh as the last poll tick, so right after a move
//! the tracker reports busy for one polling interval plus a margin without
//! looking at them.

use crate::drive::StatusBits;
use crate::error::Result;

/// Margin added to the polling interval when deciding whether a freshly
/// issued move can already be seen in the status bits.
pub const GRACE_MARGIN_MS: u64 = 10;

/// Where a stage is in its initialize/shutdown sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    /// Not initialized, or shut down.
    #[default]
    Unconnected,
    /// Checking the shared connection.
    Connecting,
    /// Deriving the unit scale.
    Configuring,
    /// Requesting the first position and status bits.
    AwaitingInitialState,
    /// Polling started, waiting for the first cycle and the enable check.
    Polling,
    /// Usable.
    Ready,
}

impl LifecycleState {
    /// State name for logging.
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Unconnected => "Unconnected",
            LifecycleState::Connecting => "Connecting",
            LifecycleState::Configuring => "Configuring",
            LifecycleState::AwaitingInitialState => "AwaitingInitialState",
            LifecycleState::Polling => "Polling",
            LifecycleState::Ready => "Ready",
        }
    }
}

/// Busy state as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionStatus {
    /// No move in flight.
    Idle,
    /// A move was issued too recently for polling to have seen it.
    MovingGrace,
    /// The polled status bits report motion.
    MovingConfirmed,
}

impl MotionStatus {
    /// Whether the stage should be reported busy.
    #[inline]
    pub fn is_busy(self) -> bool {
        !matches!(self, MotionStatus::Idle)
    }
}

/// Background polling started by a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingSession {
    /// Poll cadence.
    pub interval_ms: u32,
    /// `false` if the library refused to start polling.
    pub active: bool,
}

/// Grace window and homing tracking for one stage.
#[derive(Debug, Clone, Copy)]
pub struct MotionTracker {
    last_movement_start_ms: Option<u64>,
    homed: bool,
    polling_interval_ms: u32,
}

impl MotionTracker {
    /// Tracker for a stage polled every `polling_interval_ms`.
    pub fn new(polling_interval_ms: u32) -> Self {
        Self {
            last_movement_start_ms: None,
            homed: false,
            polling_interval_ms,
        }
    }

    /// Polling interval the grace window is based on.
    #[inline]
    pub fn polling_interval_ms(&self) -> u32 {
        self.polling_interval_ms
    }

    /// Length of the grace window.
    #[inline]
    pub fn grace_window_ms(&self) -> u64 {
        u64::from(self.polling_interval_ms) + GRACE_MARGIN_MS
    }

    /// Start of the most recent move or home, if any.
    #[inline]
    pub fn last_movement_start_ms(&self) -> Option<u64> {
        self.last_movement_start_ms
    }

    /// Note that a move or home command was accepted at `now_ms`.
    pub fn record_movement(&mut self, now_ms: u64) {
        self.last_movement_start_ms = Some(now_ms);
    }

    /// Whether `now_ms` is still inside the grace window of the last move.
    pub fn in_grace_window(&self, now_ms: u64) -> bool {
        match self.last_movement_start_ms {
            Some(start) => now_ms.saturating_sub(start) <= self.grace_window_ms(),
            None => false,
        }
    }

    /// Motion status at `now_ms`.
    ///
    /// `read_bits` is only called once the grace window has passed.
    pub fn status<F>(&self, now_ms: u64, read_bits: F) -> Result<MotionStatus>
    where
        F: FnOnce() -> Result<StatusBits>,
    {
        if self.in_grace_window(now_ms) {
            return Ok(MotionStatus::MovingGrace);
        }
        if read_bits()?.is_moving() {
            Ok(MotionStatus::MovingConfirmed)
        } else {
            Ok(MotionStatus::Idle)
        }
    }

    /// Shorthand for `status(..)?.is_busy()`.
    pub fn is_busy<F>(&self, now_ms: u64, read_bits: F) -> Result<bool>
    where
        F: FnOnce() -> Result<StatusBits>,
    {
        Ok(self.status(now_ms, read_bits)?.is_busy())
    }

    /// Record a successful home started at `now_ms`.
    pub fn mark_homed(&mut self, now_ms: u64) {
        self.homed = true;
        self.record_movement(now_ms);
    }

    /// Whether homing has completed once.
    #[inline]
    pub fn is_homed(&self) -> bool {
        self.homed
    }
}
