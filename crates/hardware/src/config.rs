//! Configuration system for the accelerator model.
//!
//! This module defines the configuration structures used to parameterize the model. It provides:
//! 1. **Defaults:** Baseline scratchpad and external memory geometry and the run budget.
//! 2. **Structures:** Hierarchical config for general, memory, and run settings.
//! 3. **Validation:** Rejection of memory maps that do not fit the device window.
//!
//! Configuration is supplied as JSON to the CLI, or use `Config::default()` directly.

use serde::Deserialize;

use crate::common::constants::{
    DEVICE_WINDOW_BYTES, EXTERNAL_BYTES, MAX_EXTERNAL_BYTES, SPAD_BYTES, SPAD0_BASE, TX_BYTES,
};
use crate::common::error::AccelError;

/// Default configuration constants for the model.
mod defaults {
    /// Default per-scratchpad capacity in bytes.
    pub const SPAD_BYTES: u64 = super::SPAD_BYTES;

    /// Default virtual external memory size (256 MiB).
    pub const EXTERNAL_BYTES: u64 = super::EXTERNAL_BYTES;

    /// Default step budget for a bounded run.
    ///
    /// Large enough for a full 3x3 convolution over a 64x64x64 tensor with 64 filters.
    pub const MAX_STEPS: u64 = 2_000_000_000;
}

/// Root configuration for the model.
///
/// # Examples
///
/// ```
/// use hlscnn_core::config::Config;
///
/// let config: Config = serde_json::from_str(r#"{ "memory": { "spad_bytes": 65536 } }"#).unwrap();
/// assert_eq!(config.memory.spad_bytes, 65536);
/// assert!(!config.general.trace_transitions);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Scratchpad and external memory geometry
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Bounded run settings
    #[serde(default)]
    pub run: RunConfig,
}

impl Config {
    /// Checks that the configured memory map is realizable.
    ///
    /// Both scratchpads must fit above `SPAD0_BASE` inside the 24-bit device window,
    /// external memory must fit the 32-bit host address space, and every capacity must be
    /// a whole number of 16-byte transactions.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the map is valid, otherwise `AccelError::InvalidConfig`.
    pub fn validate(&self) -> Result<(), AccelError> {
        let tx = TX_BYTES as u64;
        if self.memory.spad_bytes == 0 || self.memory.spad_bytes % tx != 0 {
            return Err(AccelError::InvalidConfig(format!(
                "spad_bytes {:#x} must be a non-zero multiple of {tx}",
                self.memory.spad_bytes
            )));
        }
        if self.memory.external_bytes % tx != 0 || self.memory.external_bytes > MAX_EXTERNAL_BYTES {
            return Err(AccelError::InvalidConfig(format!(
                "external_bytes {:#x} must be a multiple of {tx} no larger than {MAX_EXTERNAL_BYTES:#x}",
                self.memory.external_bytes
            )));
        }
        let top = self
            .memory
            .spad_bytes
            .checked_mul(2)
            .and_then(|both| both.checked_add(SPAD0_BASE))
            .unwrap_or(u64::MAX);
        if top > DEVICE_WINDOW_BYTES {
            return Err(AccelError::InvalidConfig(format!(
                "scratchpads end at {top:#x}, past the device window {DEVICE_WINDOW_BYTES:#x}"
            )));
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Log every FSM transition at trace level
    #[serde(default)]
    pub trace_transitions: bool,
}

/// Scratchpad and external memory geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Capacity of each scratchpad in bytes
    #[serde(default = "MemoryConfig::default_spad_bytes")]
    pub spad_bytes: u64,

    /// Size of the virtual external memory in bytes
    #[serde(default = "MemoryConfig::default_external_bytes")]
    pub external_bytes: u64,
}

impl MemoryConfig {
    /// Returns the default scratchpad capacity.
    const fn default_spad_bytes() -> u64 {
        defaults::SPAD_BYTES
    }

    /// Returns the default external memory size.
    const fn default_external_bytes() -> u64 {
        defaults::EXTERNAL_BYTES
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            spad_bytes: defaults::SPAD_BYTES,
            external_bytes: defaults::EXTERNAL_BYTES,
        }
    }
}

/// Bounded run settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Maximum number of steps `run_until_idle` may take
    #[serde(default = "RunConfig::default_max_steps")]
    pub max_steps: u64,
}

impl RunConfig {
    /// Returns the default step budget.
    const fn default_max_steps() -> u64 {
        defaults::MAX_STEPS
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: defaults::MAX_STEPS,
        }
    }
}
