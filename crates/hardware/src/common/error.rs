//! Accelerator error definitions.
//!
//! This module defines the failure modes of the model. It provides:
//! 1. **Memory faults:** Scratchpad and external accesses outside their backing arrays.
//! 2. **Decode faults:** Host addresses that fall in no region.
//! 3. **Control faults:** Triggers rejected while an engine is busy or misconfigured.
//! 4. **Run faults:** Step budgets exhausted and invalid configuration.

use thiserror::Error;

/// Errors raised by the accelerator model.
///
/// Every fallible operation returns `Result<_, AccelError>`; nothing in the model panics
/// on bad host input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AccelError {
    /// A scratchpad access did not fit inside the scratchpad.
    #[error("scratchpad {spad} access of {len} bytes at offset {offset:#x} exceeds capacity {capacity:#x}")]
    SpadOutOfRange {
        /// Scratchpad index (0 = weights, 1 = activations/outputs).
        spad: usize,
        /// Byte offset of the access.
        offset: u64,
        /// Length of the access in bytes.
        len: usize,
        /// Scratchpad capacity in bytes.
        capacity: u64,
    },

    /// An external memory access did not fit inside external memory.
    #[error("external access of {len} bytes at {addr:#x} exceeds size {size:#x}")]
    ExternalOutOfRange {
        /// Byte address of the access.
        addr: u64,
        /// Length of the access in bytes.
        len: usize,
        /// External memory size in bytes.
        size: u64,
    },

    /// A host address decoded to no region.
    #[error("address {0:#x} is not mapped")]
    Unmapped(u64),

    /// A convolution trigger arrived while a convolution was in flight.
    #[error("convolution trigger rejected: engine busy")]
    ConvBusy,

    /// A scratchpad write tried to arm the DMA while a transfer was in flight.
    #[error("dma arm rejected: transfer in flight")]
    DmaBusy,

    /// A convolution trigger decoded a zero stride.
    #[error("convolution trigger rejected: zero stride (row {row}, col {col})")]
    ZeroStride {
        /// Decoded row stride.
        row: u32,
        /// Decoded column stride.
        col: u32,
    },

    /// A bounded run exhausted its step budget with work still armed.
    #[error("step limit of {0} reached before the accelerator went idle")]
    StepLimit(u64),

    /// The configuration describes an impossible memory map.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
