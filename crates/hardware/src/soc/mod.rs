//! Accelerator SoC Components.
//!
//! This module organizes the host-facing parts of the accelerator: the register file,
//! the address decode, the memories with their DMA engine, and the builder that
//! assembles them into an `Accelerator`.

/// Accelerator assembly and host transaction handling.
pub mod builder;

/// Host address decode.
pub mod interconnect;

/// Scratchpads, external memory, and DMA.
pub mod memory;

/// Configuration register file.
pub mod registers;

/// Storage trait for byte-addressed memories.
pub mod traits;

pub use builder::Accelerator;
