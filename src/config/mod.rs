//! Configuration module for kinesis-stage.
//!
//! Provides axis scale settings, serial-number based family defaults, and
//! loading of stage configurations from TOML files (with `std` feature).

mod axis;
pub mod defaults;
#[cfg(feature = "std")]
mod loader;
mod stage;
pub mod units;
mod validation;

pub use axis::AxisConfig;
pub use defaults::{device_family, DeviceFamily};
pub use stage::{StageConfig, StageEntry, DEFAULT_POLLING_INTERVAL_MS};
pub use validation::{
    validate_axis, validate_config, validate_polling_interval, validate_serial_number,
};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{StageType, Steps};
