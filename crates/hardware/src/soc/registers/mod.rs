//! Configuration Register File.
//!
//! This module implements the host-visible register file of the accelerator. It provides:
//! 1. **Register ids:** The 30 registers in address order (`RegId`).
//! 2. **Write decode:** Selection of a register and of its 4-byte slice out of a 16-lane transaction.
//! 3. **Read path:** The inverse placement of a register value into transaction lanes.
//!
//! A register occupies a 16-byte slot: address bits `[..4]` select the register (modulo the
//! register count) and bits `[3:0]` select the lane where its little-endian value starts.
//! Slices starting at lanes 13 to 15 wrap around to lane 0.

use serde::Deserialize;

use crate::common::constants::{
    CFG_LANE_MASK, CFG_REG_BYTES, CFG_REG_SIZE_BITS, DEVICE_ADDR_MASK, NUM_CFG_REGISTERS, TX_BYTES,
};

/// Configuration register identifiers in address order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegId {
    /// Reserved register 1.
    ConfigReg1,
    /// Reserved register 2.
    ConfigReg2,
    /// Reserved register 3.
    ConfigReg3,
    /// Reserved register 4.
    ConfigReg4,
    /// External memory base address for DMA transfers.
    SocMemBaseAddr,
    /// DMA transfer length in 16-byte blocks.
    SocMemRdWrLength,
    /// Scratchpad configuration.
    SpadConfig,
    /// AXI master self-test trigger.
    AxiMasterSelfTestTrigger,
    /// AXI master self-test remote base.
    AxiMasterSelfTestRemoteBase,
    /// ACP master self-test trigger.
    AcpMasterSelfTestTrigger,
    /// ACP master self-test remote base.
    AcpMasterSelfTestRemoteBase,
    /// AXI attribute configuration.
    AxiAttrConfig,
    /// Fully-connected start flag; writing it latches the FC parameters.
    FcStartFlag,
    /// Fully-connected weight base address.
    FcWeightsBase,
    /// Fully-connected activation base address.
    FcActivationBase,
    /// Fully-connected matrix size.
    FcSizeConfig,
    /// Shared bias and activation-function configuration.
    BiasActivationConfig,
    /// Convolution trigger; writing it latches the convolution parameters and arms the engine.
    ConvTrigger,
    /// Convolution activation base address.
    ConvActivationBase,
    /// Convolution weight base address.
    ConvWeightsBase,
    /// Convolution output base address.
    ConvOutputsBase,
    /// Convolution input tensor size.
    ConvInputSize,
    /// Convolution output tensor size.
    ConvOutputSize,
    /// Convolution kernel size and strides.
    ConvKernelSize,
    /// Convolution bias, flags, and filter count.
    ConvChannel,
    /// Reduction trigger; writing it latches the reduction parameters.
    ReductionTrigger,
    /// Reduction input base address.
    ReductionInputBase,
    /// Reduction output base address.
    ReductionOutputBase,
    /// Reduction input size.
    ReductionInputSize,
    /// Reduction bias.
    ReductionBias,
}

impl RegId {
    /// Every register, indexed by its id.
    pub const ALL: [Self; NUM_CFG_REGISTERS as usize] = [
        Self::ConfigReg1,
        Self::ConfigReg2,
        Self::ConfigReg3,
        Self::ConfigReg4,
        Self::SocMemBaseAddr,
        Self::SocMemRdWrLength,
        Self::SpadConfig,
        Self::AxiMasterSelfTestTrigger,
        Self::AxiMasterSelfTestRemoteBase,
        Self::AcpMasterSelfTestTrigger,
        Self::AcpMasterSelfTestRemoteBase,
        Self::AxiAttrConfig,
        Self::FcStartFlag,
        Self::FcWeightsBase,
        Self::FcActivationBase,
        Self::FcSizeConfig,
        Self::BiasActivationConfig,
        Self::ConvTrigger,
        Self::ConvActivationBase,
        Self::ConvWeightsBase,
        Self::ConvOutputsBase,
        Self::ConvInputSize,
        Self::ConvOutputSize,
        Self::ConvKernelSize,
        Self::ConvChannel,
        Self::ReductionTrigger,
        Self::ReductionInputBase,
        Self::ReductionOutputBase,
        Self::ReductionInputSize,
        Self::ReductionBias,
    ];

    /// Returns the register's index in the file.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the register with index `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the device-window address of the register's slot (lane 0).
    pub const fn address(self) -> u64 {
        (self as u64) << CFG_REG_SIZE_BITS
    }

    /// Selects the register addressed by a (masked or unmasked) config-window address.
    pub fn decode(addr: u64) -> Self {
        let slot = ((addr & DEVICE_ADDR_MASK) >> CFG_REG_SIZE_BITS) % NUM_CFG_REGISTERS;
        Self::ALL[slot as usize]
    }
}

/// A decoded register write: which register, and the 32-bit value sliced from the lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegWrite {
    /// Target register.
    pub reg: RegId,
    /// Value to store.
    pub value: u32,
}

/// The 30-entry configuration register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigRegisters {
    regs: [u32; NUM_CFG_REGISTERS as usize],
}

impl ConfigRegisters {
    /// Creates a register file with every register cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a host write without applying it.
    ///
    /// # Arguments
    ///
    /// * `addr` - Host address; the low nibble is the starting lane.
    /// * `lanes` - The 16 data lanes of the transaction.
    ///
    /// # Returns
    ///
    /// The target register and the little-endian value of lanes `k..k+4` (mod 16).
    pub fn decode_write(addr: u64, lanes: &[u8; TX_BYTES]) -> RegWrite {
        let start = (addr & CFG_LANE_MASK) as usize;
        let mut bytes = [0u8; CFG_REG_BYTES];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = lanes[(start + i) % TX_BYTES];
        }
        RegWrite {
            reg: RegId::decode(addr),
            value: u32::from_le_bytes(bytes),
        }
    }

    /// Applies a decoded write.
    pub const fn apply(&mut self, write: RegWrite) {
        self.regs[write.reg.index()] = write.value;
    }

    /// Decodes and applies a host write in one step.
    pub fn write(&mut self, addr: u64, lanes: &[u8; TX_BYTES]) -> RegWrite {
        let write = Self::decode_write(addr, lanes);
        self.apply(write);
        write
    }

    /// Returns the value of a register.
    pub const fn get(&self, reg: RegId) -> u32 {
        self.regs[reg.index()]
    }

    /// Sets a register directly.
    pub const fn set(&mut self, reg: RegId, value: u32) {
        self.regs[reg.index()] = value;
    }

    /// Reads the register selected by `addr`, placing its bytes at lanes `k..k+4` (mod 16).
    pub fn read(&self, addr: u64) -> [u8; TX_BYTES] {
        let start = (addr & CFG_LANE_MASK) as usize;
        let value = self.get(RegId::decode(addr)).to_le_bytes();
        let mut lanes = [0u8; TX_BYTES];
        for (i, byte) in value.iter().enumerate() {
            lanes[(start + i) % TX_BYTES] = *byte;
        }
        lanes
    }
}

/// Builds the transaction that writes `value` to `reg` with the slice at lane `lane`.
///
/// # Returns
///
/// The host address (register slot plus lane) and the 16 data lanes.
pub fn encode_write(reg: RegId, value: u32, lane: usize) -> (u64, [u8; TX_BYTES]) {
    let lane = lane % TX_BYTES;
    let mut lanes = [0u8; TX_BYTES];
    for (i, byte) in value.to_le_bytes().iter().enumerate() {
        lanes[(lane + i) % TX_BYTES] = *byte;
    }
    (reg.address() | lane as u64, lanes)
}
