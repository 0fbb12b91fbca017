//! Stage module for kinesis-stage.
//!
//! Provides the single-axis stage: lifecycle sequencing, unit conversion and
//! busy tracking on top of the motor drive facade.

mod builder;
pub mod clock;
mod position;
mod stage;
pub mod state;

pub use builder::StageBuilder;
pub use clock::{Clock, ManualClock};
#[cfg(feature = "std")]
pub use clock::{StdClock, StdDelay};
pub use position::{clamp_i32, UnitScale};
pub use stage::{SingleAxisStage, NAME_CAPACITY};
pub use state::{LifecycleState, MotionStatus, MotionTracker, PollingSession, GRACE_MARGIN_MS};
