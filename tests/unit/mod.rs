//! Unit test harness for kinesis-stage.
//!
//! This module organizes unit tests for each component of the library.

mod config_parsing;
mod config_validation;
mod conversion_properties;
mod error_codes;
