//! Fully-connected and reduction parameter decode.
//!
//! These paths are modeled at their register interface only: writing the FC start flag or the
//! reduction trigger latches a parameter snapshot, and no compute follows. Layouts:
//! - FC size: cols `[11:0]`, rows `[23:12]`, batch `[26:24]` (stored as batch - 1);
//! - bias/activation: function `[1:0]`, bias enable `[2]`, ReLU threshold `[24:3]`;
//! - reduction size: cols `[9:0]`, rows `[19:10]`, channels `[29:20]`;
//! - reduction bias: bias `[15:0]`.

use crate::core::conv::params::{bit, bits};
use crate::soc::registers::{ConfigRegisters, RegId};

/// Activation function selected by the bias/activation register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActivationFunction {
    /// Identity.
    #[default]
    None,
    /// Rectified linear unit.
    Relu,
    /// ReLU clipped at the configured threshold.
    ReluThreshold,
    /// Encoding 3, reserved.
    Reserved,
}

impl ActivationFunction {
    /// Decodes the two-bit function field.
    pub const fn decode(field: u32) -> Self {
        match field & 0x3 {
            0 => Self::None,
            1 => Self::Relu,
            2 => Self::ReluThreshold,
            _ => Self::Reserved,
        }
    }
}

/// Decoded bias/activation register, shared by the FC and reduction paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BiasActivation {
    /// Activation function.
    pub function: ActivationFunction,
    /// Bias enable.
    pub enable_bias: bool,
    /// ReLU threshold.
    pub relu_threshold: u32,
}

impl BiasActivation {
    /// Decodes the bias/activation register.
    pub const fn decode(value: u32) -> Self {
        Self {
            function: ActivationFunction::decode(bits(value, 1, 0)),
            enable_bias: bit(value, 2),
            relu_threshold: bits(value, 24, 3),
        }
    }
}

/// Snapshot of the fully-connected configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FcParameters {
    /// Weight base address.
    pub weight_base: u32,
    /// Activation base address.
    pub act_base: u32,
    /// Matrix rows.
    pub rows: u32,
    /// Matrix columns.
    pub cols: u32,
    /// Batch size (decoded, i.e. field + 1).
    pub batch: u32,
    /// Bias and activation function.
    pub activation: BiasActivation,
}

impl FcParameters {
    /// Decodes the FC registers.
    pub const fn decode(regs: &ConfigRegisters) -> Self {
        let size = regs.get(RegId::FcSizeConfig);
        Self {
            weight_base: regs.get(RegId::FcWeightsBase),
            act_base: regs.get(RegId::FcActivationBase),
            cols: bits(size, 11, 0),
            rows: bits(size, 23, 12),
            batch: bits(size, 26, 24) + 1,
            activation: BiasActivation::decode(regs.get(RegId::BiasActivationConfig)),
        }
    }
}

/// Snapshot of the reduction configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReductionParameters {
    /// Input base address.
    pub input_base: u32,
    /// Output base address.
    pub output_base: u32,
    /// Input rows.
    pub rows: u32,
    /// Input columns.
    pub cols: u32,
    /// Input channels.
    pub chans: u32,
    /// Bias (Q9.7).
    pub bias: i16,
    /// Bias and activation function.
    pub activation: BiasActivation,
}

impl ReductionParameters {
    /// Decodes the reduction registers.
    pub const fn decode(regs: &ConfigRegisters) -> Self {
        let size = regs.get(RegId::ReductionInputSize);
        Self {
            input_base: regs.get(RegId::ReductionInputBase),
            output_base: regs.get(RegId::ReductionOutputBase),
            cols: bits(size, 9, 0),
            rows: bits(size, 19, 10),
            chans: bits(size, 29, 20),
            bias: bits(regs.get(RegId::ReductionBias), 15, 0) as u16 as i16,
            activation: BiasActivation::decode(regs.get(RegId::BiasActivationConfig)),
        }
    }
}
