//! Common types and constants used throughout the accelerator model.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Constants:** Transaction widths, the memory map, and fixed-point formats.
//! 2. **Error Handling:** The `AccelError` type returned by fallible operations.

/// Common constants used throughout the model.
pub mod constants;

/// Error types for the accelerator.
pub mod error;

pub use constants::{TX_BYTES, VECTOR_BYTES, VECTOR_LANES};
pub use error::AccelError;

/// One datapath vector: eight signed 16-bit lanes.
pub type Vector = [i16; VECTOR_LANES];
