//! Global Accelerator Constants.
//!
//! This module defines the widths and memory-map constants shared across the model. It includes:
//! 1. **Transaction Constants:** Host transaction width and device offset masking.
//! 2. **Register Constants:** Register file size and register address decoding.
//! 3. **Memory Constants:** Default scratchpad and external memory geometry.
//! 4. **Datapath Constants:** Vector lane count and fixed-point formats.

/// Number of byte lanes carried by one host transaction (128-bit bus).
pub const TX_BYTES: usize = 16;

/// Mask applied to host addresses; the top 8 bits select the device and are dropped.
pub const DEVICE_ADDR_MASK: u64 = 0x00FF_FFFF;

/// Size of the device address window after masking.
pub const DEVICE_WINDOW_BYTES: u64 = DEVICE_ADDR_MASK + 1;

/// Number of configuration registers.
pub const NUM_CFG_REGISTERS: u64 = 30;

/// Address bits consumed by one configuration register slot.
pub const CFG_REG_SIZE_BITS: u64 = 4;

/// Mask extracting the byte-lane offset of a register slice within a transaction.
pub const CFG_LANE_MASK: u64 = (1 << CFG_REG_SIZE_BITS) - 1;

/// Width of one configuration register in bytes.
pub const CFG_REG_BYTES: usize = 4;

/// Base address of scratchpad 0 (weights); everything below is the config window.
pub const SPAD0_BASE: u64 = 0x4000;

/// Default scratchpad capacity in 16-byte entries.
pub const SPAD_ENTRIES: u64 = 4 * 0x1FF00;

/// Default scratchpad capacity in bytes.
pub const SPAD_BYTES: u64 = SPAD_ENTRIES * TX_BYTES as u64;

/// Default size of the virtual external (SoC) memory in bytes.
pub const EXTERNAL_BYTES: u64 = 0x1000_0000;

/// Largest virtual external memory; virtual accesses carry 32-bit host addresses.
pub const MAX_EXTERNAL_BYTES: u64 = 1 << 32;

/// Lanes per datapath vector (also the channel block size).
pub const VECTOR_LANES: usize = 8;

/// Bytes per 16-bit vector element.
pub const ELEMENT_BYTES: usize = 2;

/// Bytes moved per vector, per DMA block, and per address-generator stride unit.
pub const VECTOR_BYTES: u64 = (VECTOR_LANES * ELEMENT_BYTES) as u64;

/// Fractional bits of a convolution weight (Q2.14).
pub const WEIGHT_FRAC_BITS: u32 = 14;

/// Fractional bits of an activation (Q9.7).
pub const ACT_FRAC_BITS: u32 = 7;

/// Fractional bits of a partial sum (Q16.16).
pub const PSUM_FRAC_BITS: u32 = 16;
