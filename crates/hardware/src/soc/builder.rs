//! Accelerator construction and the top-level `Accelerator` type.
//!
//! This module assembles the accelerator from configuration. It performs:
//! 1. **Memory setup:** Allocates both scratchpads and the external memory.
//! 2. **Host writes:** Routes each transaction to the register file, a DMA arm, or external memory.
//! 3. **Trigger handling:** Latches convolution, FC, and reduction parameters on their trigger writes.
//! 4. **Stepping:** Advances the DMA engine and the convolution engine one transition each.

use tracing::debug;

use crate::common::{AccelError, TX_BYTES};
use crate::config::Config;
use crate::core::conv::ConvEngine;
use crate::core::conv::params::ConvParameters;
use crate::core::conv::state::Transition;
use crate::core::params::{FcParameters, ReductionParameters};
use crate::soc::interconnect::{AddressMap, Target};
use crate::soc::memory::dma::DmaStep;
use crate::soc::memory::{Memory, SpadId};
use crate::soc::registers::{ConfigRegisters, RegId, RegWrite, encode_write};
use crate::soc::traits::Storage;

/// Side effect of one host write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteEffect {
    /// A plain register write.
    Register(RegWrite),
    /// The convolution trigger was accepted and the engine armed.
    ConvArmed(ConvParameters),
    /// The FC start flag latched new FC parameters.
    FcLatched(FcParameters),
    /// The reduction trigger latched new reduction parameters.
    ReductionLatched(ReductionParameters),
    /// A scratchpad-window write armed the DMA engine.
    DmaArmed {
        /// Destination scratchpad.
        target: SpadId,
        /// Scratchpad offset of the write.
        offset: u64,
    },
    /// Sixteen bytes were stored into external memory.
    External(u64),
}

/// What one `step` advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// DMA engine outcome.
    pub dma: DmaStep,
    /// Convolution transition, if the engine was armed.
    pub conv: Option<Transition>,
}

/// The accelerator: register file, memories, and engines.
#[derive(Debug)]
pub struct Accelerator {
    map: AddressMap,
    registers: ConfigRegisters,
    memory: Memory,
    conv: ConvEngine,
    fc: Option<FcParameters>,
    reduction: Option<ReductionParameters>,
}

impl Accelerator {
    /// Builds an accelerator from configuration.
    ///
    /// # Errors
    ///
    /// `AccelError::InvalidConfig` if the memory map does not validate.
    pub fn new(config: &Config) -> Result<Self, AccelError> {
        config.validate()?;
        debug!(
            spad_bytes = config.memory.spad_bytes,
            external_bytes = config.memory.external_bytes,
            "accelerator built"
        );
        Ok(Self {
            map: AddressMap::new(&config.memory),
            registers: ConfigRegisters::new(),
            memory: Memory::new(&config.memory),
            conv: ConvEngine::new(),
            fc: None,
            reduction: None,
        })
    }

    /// Services one host write transaction.
    ///
    /// # Arguments
    ///
    /// * `addr` - Host address.
    /// * `lanes` - The 16 data lanes.
    /// * `virtual_access` - Target external memory instead of the device window.
    ///
    /// # Errors
    ///
    /// * `AccelError::Unmapped` for addresses in no region.
    /// * `AccelError::ConvBusy` / `ZeroStride` for a rejected convolution trigger; the
    ///   trigger register keeps its previous value.
    /// * `AccelError::DmaBusy` for a scratchpad write during a transfer.
    /// * `AccelError::ExternalOutOfRange` for a virtual write straddling the end of memory.
    pub fn write(
        &mut self,
        addr: u64,
        lanes: &[u8; TX_BYTES],
        virtual_access: bool,
    ) -> Result<WriteEffect, AccelError> {
        match self.map.decode(addr, virtual_access)? {
            Target::Config(masked) => self.write_config(masked, lanes),
            Target::Spad(target, offset) => {
                let base = u64::from(self.registers.get(RegId::SocMemBaseAddr));
                let length = u64::from(self.registers.get(RegId::SocMemRdWrLength));
                self.memory.arm_dma(target, offset, base, length)?;
                Ok(WriteEffect::DmaArmed { target, offset })
            }
            Target::External(raw) => {
                self.memory.external_mut().write_bytes(raw, lanes)?;
                Ok(WriteEffect::External(raw))
            }
        }
    }

    fn write_config(
        &mut self,
        addr: u64,
        lanes: &[u8; TX_BYTES],
    ) -> Result<WriteEffect, AccelError> {
        let write = ConfigRegisters::decode_write(addr, lanes);
        match write.reg {
            RegId::ConvTrigger => {
                let params = ConvParameters::decode(&self.registers);
                self.conv.arm(params)?;
                self.registers.apply(write);
                Ok(WriteEffect::ConvArmed(params))
            }
            RegId::FcStartFlag => {
                self.registers.apply(write);
                let params = FcParameters::decode(&self.registers);
                debug!(?params, "fc parameters latched");
                self.fc = Some(params);
                Ok(WriteEffect::FcLatched(params))
            }
            RegId::ReductionTrigger => {
                self.registers.apply(write);
                let params = ReductionParameters::decode(&self.registers);
                debug!(?params, "reduction parameters latched");
                self.reduction = Some(params);
                Ok(WriteEffect::ReductionLatched(params))
            }
            _ => {
                self.registers.apply(write);
                Ok(WriteEffect::Register(write))
            }
        }
    }

    /// Writes `value` to `reg` through the normal config path (slice at lane 0).
    ///
    /// # Errors
    ///
    /// Same as `write` for a config-window address.
    pub fn write_register(&mut self, reg: RegId, value: u32) -> Result<WriteEffect, AccelError> {
        let (addr, lanes) = encode_write(reg, value, 0);
        self.write(addr, &lanes, false)
    }

    /// Reads 16 bytes for observation.
    ///
    /// Config addresses return the register value at lanes `k..k+4`; scratchpad and virtual
    /// addresses return the 16 bytes at the decoded offset.
    ///
    /// # Errors
    ///
    /// Unmapped addresses and reads leaving the backing memory.
    pub fn read(&self, addr: u64, virtual_access: bool) -> Result<[u8; TX_BYTES], AccelError> {
        let mut out = [0u8; TX_BYTES];
        match self.map.decode(addr, virtual_access)? {
            Target::Config(masked) => return Ok(self.registers.read(masked)),
            Target::Spad(id, offset) => {
                out.copy_from_slice(self.memory.spad(id).read_bytes(offset, TX_BYTES)?);
            }
            Target::External(raw) => {
                out.copy_from_slice(self.memory.external().read_bytes(raw, TX_BYTES)?);
            }
        }
        Ok(out)
    }

    /// Advances the DMA engine, then the convolution engine, by one transition each.
    ///
    /// Both engines advance even when one of them faults.
    ///
    /// # Errors
    ///
    /// Memory faults from either engine; the faulting engine is disarmed. A DMA fault is
    /// reported ahead of a convolution fault raised on the same step.
    pub fn step(&mut self) -> Result<StepReport, AccelError> {
        let dma = self.memory.step_dma();
        let conv = self.conv.step(&mut self.memory);
        Ok(StepReport {
            dma: dma?,
            conv: conv?,
        })
    }

    /// Returns `true` when neither engine is armed.
    pub const fn is_idle(&self) -> bool {
        !self.conv.is_armed() && !self.memory.dma().is_busy()
    }

    /// Returns the register file.
    pub const fn registers(&self) -> &ConfigRegisters {
        &self.registers
    }

    /// Returns the memory subsystem.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Returns the memory subsystem mutably, for staging data behind the host's back.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Returns the convolution engine.
    pub const fn conv(&self) -> &ConvEngine {
        &self.conv
    }

    /// Returns the address map.
    pub const fn address_map(&self) -> &AddressMap {
        &self.map
    }

    /// Returns the last latched FC parameters.
    pub const fn fc_params(&self) -> Option<&FcParameters> {
        self.fc.as_ref()
    }

    /// Returns the last latched reduction parameters.
    pub const fn reduction_params(&self) -> Option<&ReductionParameters> {
        self.reduction.as_ref()
    }
}
