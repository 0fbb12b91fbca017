//! # kinesis-stage
//!
//! Motorized stages driven through a vendor motion-control library, exposed
//! as physical positions with busy tracking and an ordered lifecycle.
//!
//! ## Features
//!
//! - **Runtime binding**: Vendor entry points resolved from a shared library
//! - **Unit conversion**: Micrometers or degrees to device units, saturated to `i32`
//! - **Busy tracking**: Grace window after each move, then polled status bits
//! - **Lifecycle**: Connect, request state, poll, enable; symmetric shutdown
//! - **Configuration-driven**: Define stages in TOML files
//! - **Testable**: Scripted in-memory library and injectable clock
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kinesis_stage::{DeviceConnection, KinesisLibrary, SingleAxisStage, StageConfig};
//! use kinesis_stage::motor::{StdClock, StdDelay};
//!
//! let config: StageConfig = kinesis_stage::load_config("stages.toml")?;
//! let library = KinesisLibrary::shared(&*config.library, &config.symbol_prefix);
//! let connection = DeviceConnection::open(library, "55000001");
//!
//! let mut stage = SingleAxisStage::builder(&connection)
//!     .from_config(&config, "rotator")?
//!     .clock(StdClock::new())
//!     .delay(StdDelay)
//!     .build()?;
//!
//! stage.initialize()?;
//! stage.set_position(90.0)?;
//! while stage.is_busy()? {}
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables the runtime library binding, TOML parsing and `log` output
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[macro_use]
mod fmt;

// Core modules
pub mod binding;
pub mod codes;
pub mod config;
pub mod connection;
pub mod drive;
pub mod error;
pub mod motor;

// Re-exports for ergonomic API
pub use binding::{FakeLibrary, MotionControlLibrary};
pub use codes::error_text;
pub use config::{validate_config, AxisConfig, StageConfig, StageEntry};
pub use connection::DeviceConnection;
pub use drive::{DeviceAddress, HardwareInfo, MotorDrive, StatusBits};
pub use error::{ConfigError, Error, Result};
pub use motor::{state, LifecycleState, MotionStatus, SingleAxisStage, StageBuilder, UnitScale};

// Runtime binding and configuration loading (std only)
#[cfg(feature = "std")]
pub use binding::KinesisLibrary;
#[cfg(feature = "std")]
pub use config::load_config;

// Unit types
pub use config::units::{StageType, Steps};
