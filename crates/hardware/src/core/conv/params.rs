//! Convolution trigger decode.
//!
//! Writing the convolution trigger register snapshots the convolution registers into one
//! immutable `ConvParameters`. Field layouts:
//! - input/output size: cols `[9:0]`, rows `[19:10]`, channels `[31:20]`;
//! - kernel size: cols `[7:0]`, rows `[15:8]`, col stride `[18:16]`, row stride `[21:19]`;
//! - channel: bias `[15:0]`, bias enable `[16]`, ReLU enable `[17]`, accumulate `[18]`,
//!   filter count `[30:19]`, writeback enable `[31]`.

use crate::common::VECTOR_LANES;
use crate::soc::registers::{ConfigRegisters, RegId};

/// Extracts bits `[hi:lo]` of `value`.
pub(crate) const fn bits(value: u32, hi: u32, lo: u32) -> u32 {
    let width = hi - lo + 1;
    if width >= 32 {
        value >> lo
    } else {
        (value >> lo) & ((1 << width) - 1)
    }
}

/// Extracts bit `pos` of `value` as a flag.
pub(crate) const fn bit(value: u32, pos: u32) -> bool {
    (value >> pos) & 1 == 1
}

/// Decoded rows/cols/channels of a tensor size register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TensorShape {
    /// Rows.
    pub rows: u32,
    /// Columns.
    pub cols: u32,
    /// Channels.
    pub chans: u32,
}

impl TensorShape {
    /// Decodes a convolution size register.
    pub const fn decode(value: u32) -> Self {
        Self {
            cols: bits(value, 9, 0),
            rows: bits(value, 19, 10),
            chans: bits(value, 31, 20),
        }
    }

    /// Encodes the shape back into register layout (fields truncated to width).
    pub const fn encode(&self) -> u32 {
        (self.cols & 0x3FF) | ((self.rows & 0x3FF) << 10) | ((self.chans & 0xFFF) << 20)
    }
}

/// Snapshot of one convolution's configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvParameters {
    /// Input tensor shape.
    pub input: TensorShape,
    /// Output tensor shape.
    pub output: TensorShape,
    /// Kernel rows.
    pub kernel_rows: u32,
    /// Kernel columns.
    pub kernel_cols: u32,
    /// Row stride.
    pub row_stride: u32,
    /// Column stride.
    pub col_stride: u32,
    /// Bias added at the last tap (Q9.7).
    pub bias: i16,
    /// Add the bias at the last tap.
    pub enable_bias: bool,
    /// Apply ReLU at the last tap.
    pub enable_relu: bool,
    /// Accumulate onto existing output contents instead of starting from zero.
    pub enable_accumulate: bool,
    /// Writeback enable flag (latched; the engine always writes back).
    pub enable_writeback: bool,
    /// Number of output filters.
    pub filter_count: u32,
    /// Activation base, a byte offset into scratchpad 1.
    pub act_base: u32,
    /// Weight base, a byte offset into scratchpad 0.
    pub weight_base: u32,
    /// Output base, a byte offset into scratchpad 1.
    pub out_base: u32,
}

impl ConvParameters {
    /// Decodes the convolution registers.
    ///
    /// # Arguments
    ///
    /// * `regs` - The register file at the moment of the trigger write.
    pub const fn decode(regs: &ConfigRegisters) -> Self {
        let kernel = regs.get(RegId::ConvKernelSize);
        let channel = regs.get(RegId::ConvChannel);
        Self {
            input: TensorShape::decode(regs.get(RegId::ConvInputSize)),
            output: TensorShape::decode(regs.get(RegId::ConvOutputSize)),
            kernel_cols: bits(kernel, 7, 0),
            kernel_rows: bits(kernel, 15, 8),
            col_stride: bits(kernel, 18, 16),
            row_stride: bits(kernel, 21, 19),
            bias: bits(channel, 15, 0) as u16 as i16,
            enable_bias: bit(channel, 16),
            enable_relu: bit(channel, 17),
            enable_accumulate: bit(channel, 18),
            filter_count: bits(channel, 30, 19),
            enable_writeback: bit(channel, 31),
            act_base: regs.get(RegId::ConvActivationBase),
            weight_base: regs.get(RegId::ConvWeightsBase),
            out_base: regs.get(RegId::ConvOutputsBase),
        }
    }

    /// Encodes the kernel-size register for these parameters.
    pub const fn kernel_register(&self) -> u32 {
        (self.kernel_cols & 0xFF)
            | ((self.kernel_rows & 0xFF) << 8)
            | ((self.col_stride & 0x7) << 16)
            | ((self.row_stride & 0x7) << 19)
    }

    /// Encodes the channel register for these parameters.
    pub const fn channel_register(&self) -> u32 {
        (self.bias as u16 as u32)
            | ((self.enable_bias as u32) << 16)
            | ((self.enable_relu as u32) << 17)
            | ((self.enable_accumulate as u32) << 18)
            | ((self.filter_count & 0xFFF) << 19)
            | ((self.enable_writeback as u32) << 31)
    }

    /// Number of input channel blocks, `ceil(input channels / 8)`.
    pub const fn channel_blocks(&self) -> u32 {
        self.input.chans.div_ceil(VECTOR_LANES as u32)
    }

    /// Upper bound on kernel taps visited by one run.
    pub const fn tap_bound(&self) -> u64 {
        self.filter_count as u64
            * self.channel_blocks() as u64
            * self.input.rows as u64
            * self.input.cols as u64
            * self.kernel_rows as u64
            * self.kernel_cols as u64
    }
}
