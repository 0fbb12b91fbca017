//! Single-axis stage.
//!
//! Sequences initialization against the controller's asynchronous status
//! channel, converts between physical units and device units, and reports
//! busy from the grace window and the polled status bits.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::binding::MotionControlLibrary;
use crate::config::units::Steps;
use crate::config::{validate_axis, AxisConfig};
use crate::connection::DeviceConnection;
use crate::drive::{HardwareInfo, MotorDrive};
use crate::error::{Error, Result};

use super::builder::StageBuilder;
use super::clock::Clock;
use super::position::UnitScale;
use super::state::{LifecycleState, MotionStatus, MotionTracker, PollingSession};

/// Capacity of stage names.
pub const NAME_CAPACITY: usize = 64;

/// One axis of a (possibly multi-channel) controller.
///
/// Generic over:
/// - `L`: vendor library binding
/// - `C`: millisecond clock for the grace window
/// - `D`: delay used to wait for the first poll cycle
pub struct SingleAxisStage<'a, L, C, D>
where
    L: MotionControlLibrary,
    C: Clock,
    D: DelayNs,
{
    /// Shared controller connection.
    connection: &'a DeviceConnection<'a, L>,

    /// Channel on the controller.
    channel: u16,

    /// Name given at construction; generated otherwise.
    given_name: Option<String<NAME_CAPACITY>>,

    /// Axis settings; only read by `initialize`.
    axis: AxisConfig,

    /// Requested polling interval.
    polling_interval_ms: u32,

    /// Drive for this channel while initialized.
    drive: Option<MotorDrive<'a, L>>,

    /// Scale fixed at initialization.
    scale: Option<UnitScale>,

    /// Grace window and homing state.
    tracker: MotionTracker,

    /// Polling started by `initialize`.
    polling: Option<PollingSession>,

    /// Whether `initialize` enabled the channel.
    did_enable: bool,

    lifecycle: LifecycleState,

    clock: C,

    delay: D,
}

impl<'a, L, C, D> SingleAxisStage<'a, L, C, D>
where
    L: MotionControlLibrary,
    C: Clock,
    D: DelayNs,
{
    /// Start building a stage on `connection`.
    pub fn builder(connection: &'a DeviceConnection<'a, L>) -> StageBuilder<'a, L, C, D> {
        StageBuilder::new(connection)
    }

    pub(crate) fn new(
        connection: &'a DeviceConnection<'a, L>,
        channel: u16,
        given_name: Option<String<NAME_CAPACITY>>,
        axis: AxisConfig,
        polling_interval_ms: u32,
        clock: C,
        delay: D,
    ) -> Self {
        Self {
            connection,
            channel,
            given_name,
            axis,
            polling_interval_ms,
            drive: None,
            scale: None,
            tracker: MotionTracker::new(polling_interval_ms),
            polling: None,
            did_enable: false,
            lifecycle: LifecycleState::Unconnected,
            clock,
            delay,
        }
    }

    // Lifecycle

    /// Connect, configure, request the initial state, start polling and
    /// make sure the channel is enabled.
    ///
    /// Does nothing if the stage is already ready. On failure the stage is
    /// left unconnected; polling started along the way is stopped again.
    ///
    /// # Errors
    ///
    /// - [`Error::LibraryUnavailable`] or [`Error::Connection`] if the shared
    ///   connection is invalid; nothing is sent to the device.
    /// - [`Error::Config`] if the axis scale is not finite and positive.
    /// - [`Error::Hardware`] if requesting the initial state or enabling the
    ///   channel fails.
    pub fn initialize(&mut self) -> Result<()> {
        if self.lifecycle == LifecycleState::Ready {
            return Ok(());
        }

        match self.try_initialize() {
            Ok(()) => {
                self.set_lifecycle(LifecycleState::Ready);
                Ok(())
            }
            Err(e) => {
                warn!("initialization of channel {} failed: code {}", self.channel, e.code());
                self.abort_initialize();
                Err(e)
            }
        }
    }

    fn try_initialize(&mut self) -> Result<()> {
        self.set_lifecycle(LifecycleState::Connecting);
        let drive = self.connection.drive(self.channel)?;
        self.drive = Some(drive.clone());

        self.set_lifecycle(LifecycleState::Configuring);
        validate_axis(&self.axis)?;
        let scale = UnitScale::from_axis(&self.axis);
        debug!(
            "{} stage, {} device units per {}",
            self.axis.stage_type.name(),
            scale.device_units_per_micrometer(),
            self.axis.stage_type.unit_symbol()
        );
        self.scale = Some(scale);
        self.tracker = MotionTracker::new(self.polling_interval_ms);
        self.did_enable = false;

        self.set_lifecycle(LifecycleState::AwaitingInitialState);
        drive.request_position()?;
        drive.request_status_bits()?;

        let active = drive.start_polling(self.polling_interval_ms)?;
        if !active {
            warn!(
                "polling did not start on channel {}; status will not refresh",
                self.channel
            );
        }
        self.polling = Some(PollingSession {
            interval_ms: self.polling_interval_ms,
            active,
        });
        self.set_lifecycle(LifecycleState::Polling);

        // Status read before the first poll cycle lands reports "disabled".
        self.delay.delay_ms(self.polling_interval_ms);

        if !drive.is_channel_enabled()? {
            info!("enabling channel {}", self.channel);
            drive.set_channel_enabled(true)?;
            self.did_enable = true;
        }

        Ok(())
    }

    fn abort_initialize(&mut self) {
        if let (Some(drive), Some(_)) = (self.drive.as_ref(), self.polling) {
            let _ = drive.stop_polling();
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.drive = None;
        self.scale = None;
        self.polling = None;
        self.did_enable = false;
        self.set_lifecycle(LifecycleState::Unconnected);
    }

    /// Undo `initialize`: disable the channel if it was enabled here, then
    /// stop polling. The shared connection stays open.
    ///
    /// Polling is stopped even if disabling fails; the first error is
    /// returned.
    pub fn shutdown(&mut self) -> Result<()> {
        let drive = match self.drive.as_ref() {
            Some(drive) => drive,
            None => return Ok(()),
        };

        let mut result = Ok(());
        if self.did_enable {
            info!("disabling channel {}", self.channel);
            result = drive.set_channel_enabled(false);
        }
        if self.polling.is_some() {
            let stopped = drive.stop_polling();
            if result.is_ok() {
                result = stopped;
            }
        }

        self.reset();
        result
    }

    fn set_lifecycle(&mut self, state: LifecycleState) {
        if self.lifecycle != state {
            debug!(
                "channel {}: {} -> {}",
                self.channel,
                self.lifecycle.as_str(),
                state.as_str()
            );
            self.lifecycle = state;
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    /// Whether `initialize` has completed.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.lifecycle == LifecycleState::Ready
    }

    fn ready_drive(&self) -> Result<&MotorDrive<'a, L>> {
        match (&self.drive, self.lifecycle) {
            (Some(drive), LifecycleState::Ready) => Ok(drive),
            _ => Err(Error::NotInitialized),
        }
    }

    fn ready_scale(&self) -> Result<UnitScale> {
        match (self.scale, self.lifecycle) {
            (Some(scale), LifecycleState::Ready) => Ok(scale),
            _ => Err(Error::NotInitialized),
        }
    }

    // Motion

    /// Motion status at the current time.
    pub fn motion_status(&self) -> Result<MotionStatus> {
        let drive = self.ready_drive()?;
        self.tracker
            .status(self.clock.now_ms(), || drive.status_bits())
    }

    /// Whether the stage is moving, or a move was issued too recently for
    /// polling to have seen it.
    pub fn is_busy(&self) -> Result<bool> {
        Ok(self.motion_status()?.is_busy())
    }

    /// Current position in micrometers, or degrees on rotational stages.
    pub fn position(&self) -> Result<f64> {
        let scale = self.ready_scale()?;
        Ok(scale.steps_to_physical(self.position_steps()?))
    }

    /// Move to `value` micrometers, or degrees on rotational stages.
    ///
    /// Targets beyond the device's `i32` range are clamped.
    pub fn set_position(&mut self, value: f64) -> Result<()> {
        let steps = self.ready_scale()?.physical_to_steps(value);
        self.move_to(steps)
    }

    /// Current position in device units, from the position counter.
    pub fn position_steps(&self) -> Result<Steps> {
        Ok(Steps(self.ready_drive()?.position_counter()?))
    }

    /// Move to `steps` device units (a position index on multi-position
    /// devices), saturated to `i32`.
    pub fn set_position_steps(&mut self, steps: Steps) -> Result<()> {
        self.move_to(steps.saturating_i32())
    }

    fn move_to(&mut self, target: i32) -> Result<()> {
        self.ready_drive()?.move_to_position(target)?;
        let now = self.clock.now_ms();
        self.tracker.record_movement(now);
        debug!("channel {}: move to {}", self.channel, target);
        Ok(())
    }

    /// Home the stage once.
    ///
    /// Later calls return `Ok(())` without talking to the device.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] if the device cannot home at all, checked
    /// before anything else; [`Error::Hardware`] if the home command fails.
    pub fn home(&mut self) -> Result<()> {
        let drive = self.ready_drive()?;
        if !drive.can_home()? {
            return Err(Error::Unsupported);
        }
        if self.tracker.is_homed() {
            return Ok(());
        }
        drive.home()?;
        let now = self.clock.now_ms();
        self.tracker.mark_homed(now);
        info!("channel {}: homing", self.channel);
        Ok(())
    }

    /// Whether homing has been issued successfully.
    #[inline]
    pub fn is_homed(&self) -> bool {
        self.tracker.is_homed()
    }

    // Configuration and identification

    /// Replace the axis settings. Takes effect at the next `initialize`,
    /// which rejects an invalid scale.
    pub fn set_axis_config(&mut self, axis: AxisConfig) {
        self.axis = axis;
    }

    /// Axis settings used by the next `initialize`.
    #[inline]
    pub fn axis_config(&self) -> &AxisConfig {
        &self.axis
    }

    /// Scale in use, once initialized.
    #[inline]
    pub fn scale(&self) -> Option<UnitScale> {
        self.scale
    }

    /// Polling session started by `initialize`.
    #[inline]
    pub fn polling_session(&self) -> Option<PollingSession> {
        self.polling
    }

    /// Whether the stage is running without live status because polling did
    /// not start.
    pub fn polling_degraded(&self) -> bool {
        matches!(self.polling, Some(PollingSession { active: false, .. }))
    }

    /// Whether `initialize` enabled the channel.
    #[inline]
    pub fn did_enable(&self) -> bool {
        self.did_enable
    }

    /// Channel on the controller.
    #[inline]
    pub fn channel(&self) -> u16 {
        self.channel
    }

    /// Shared connection.
    #[inline]
    pub fn connection(&self) -> &'a DeviceConnection<'a, L> {
        self.connection
    }

    /// Hardware information for this channel.
    pub fn hardware_info(&self) -> Result<HardwareInfo> {
        self.connection.drive(self.channel)?.hardware_info()
    }

    /// Name reported to the host.
    ///
    /// The given name if any; otherwise `Model_Serial`, with `-Channel`
    /// appended for channels above 0. A stage whose connection failed is
    /// named `Error<code>_Serial`.
    pub fn name(&self) -> String<NAME_CAPACITY> {
        if let Some(name) = &self.given_name {
            return name.clone();
        }

        let mut name = String::new();
        let prefix = match self.connection.error() {
            None => self.hardware_info().map(|info| info.model_number).ok(),
            Some(_) => None,
        };
        // Overflowing the name capacity truncates it.
        let _ = match (prefix, self.connection.error()) {
            (Some(model), _) => write!(name, "{}", model),
            (None, Some(Error::Connection(code))) => write!(name, "Error{}", code),
            (None, Some(e)) => write!(name, "Error{}", e.code()),
            (None, None) => write!(name, "Error"),
        };
        let _ = write!(name, "_{}", self.connection.serial_number());
        if self.channel > 0 {
            let _ = write!(name, "-{}", self.channel);
        }
        name
    }
}

impl<'a, L, C, D> Drop for SingleAxisStage<'a, L, C, D>
where
    L: MotionControlLibrary,
    C: Clock,
    D: DelayNs,
{
    fn drop(&mut self) {
        if self.drive.is_some() {
            let _ = self.shutdown();
        }
    }
}
