//! HLSCNN convolution accelerator model.
//!
//! This crate implements an instruction-level, executable model of the HLSCNN CNN accelerator:
//! 1. **Registers:** The memory-mapped configuration register file and its lane-aligned write decode.
//! 2. **Core:** The nested convolution state machine, address generation, and fixed-point datapath.
//! 3. **Memory:** Two scratchpads, a virtual external memory, and the DMA block-transfer engine.
//! 4. **SoC:** Host address decode and the top-level `Accelerator`.
//! 5. **Simulation:** Configuration, bounded run loops, JSON scenarios, and statistics.

/// Common types and constants (memory map, widths, errors).
pub mod common;
/// Model configuration (defaults and hierarchical config structures).
pub mod config;
/// Compute core (convolution engine, datapath units, FC/reduction decode).
pub mod core;
/// Simulator driver and scenario scripts.
pub mod sim;
/// Accelerator SoC (builder, registers, interconnect, memory, traits).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Error type returned by every fallible operation.
pub use crate::common::AccelError;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Convolution engine type.
pub use crate::core::ConvEngine;
/// Top-level accelerator; construct with `Accelerator::new`.
pub use crate::soc::Accelerator;
