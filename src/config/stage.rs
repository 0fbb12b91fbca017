//! Stage configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::axis::AxisConfig;
use super::defaults;
use super::units::StageType;

/// Default polling interval in milliseconds.
pub const DEFAULT_POLLING_INTERVAL_MS: u32 = 100;

/// Default library file for benchtop stepper controllers.
pub const DEFAULT_LIBRARY: &str = "Thorlabs.MotionControl.Benchtop.StepperMotor.dll";

/// Default symbol prefix for benchtop stepper controllers.
pub const DEFAULT_SYMBOL_PREFIX: &str = "SBC";

/// One configured axis.
#[derive(Debug, Clone, Deserialize)]
pub struct StageEntry {
    /// Controller serial number (digits only).
    pub serial_number: String<16>,

    /// Channel on multi-channel controllers.
    #[serde(default)]
    pub channel: u16,

    /// Name reported to the host instead of the generated one.
    #[serde(default)]
    pub name: Option<String<64>>,

    /// Overrides the family default.
    #[serde(default)]
    pub stage_type: Option<StageType>,

    /// Overrides the family default.
    #[serde(default)]
    pub device_units_per_millimeter: Option<f64>,

    /// Overrides the family default.
    #[serde(default)]
    pub device_units_per_revolution: Option<f64>,
}

impl StageEntry {
    /// Resolve the axis configuration, filling gaps from the device family.
    pub fn axis_config(&self) -> AxisConfig {
        let family = defaults::device_family(&self.serial_number);
        AxisConfig {
            stage_type: self.stage_type.unwrap_or(family.stage_type()),
            device_units_per_millimeter: self
                .device_units_per_millimeter
                .unwrap_or(family.device_units_per_millimeter()),
            device_units_per_revolution: self
                .device_units_per_revolution
                .unwrap_or(family.device_units_per_revolution()),
        }
    }
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    /// Path or file name of the vendor library.
    #[serde(default = "default_library")]
    pub library: String<128>,

    /// Prefix of the exported entry points (e.g. `SBC`).
    #[serde(default = "default_symbol_prefix")]
    pub symbol_prefix: String<8>,

    /// Status polling interval shared by every stage.
    #[serde(default = "default_polling_interval")]
    pub polling_interval_ms: u32,

    /// Named stages.
    #[serde(default)]
    pub stages: FnvIndexMap<String<32>, StageEntry, 16>,
}

fn default_library() -> String<128> {
    String::try_from(DEFAULT_LIBRARY).unwrap_or_default()
}

fn default_symbol_prefix() -> String<8> {
    String::try_from(DEFAULT_SYMBOL_PREFIX).unwrap_or_default()
}

fn default_polling_interval() -> u32 {
    DEFAULT_POLLING_INTERVAL_MS
}

impl StageConfig {
    /// Get a stage entry by name.
    pub fn stage(&self, name: &str) -> Option<&StageEntry> {
        self.stages
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all stage names.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.keys().map(|s| s.as_str())
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            symbol_prefix: default_symbol_prefix(),
            polling_interval_ms: DEFAULT_POLLING_INTERVAL_MS,
            stages: FnvIndexMap::new(),
        }
    }
}
