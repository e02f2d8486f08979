//! Accelerator Memory Subsystem.
//!
//! This module implements the memories the accelerator reads and writes. It provides:
//! 1. **Buffer:** Lazily allocated backing storage (`ByteBuffer`).
//! 2. **Scratchpads:** Two on-chip arrays; SPAD0 holds weights, SPAD1 activations and outputs.
//! 3. **External memory:** The large virtual SoC memory the host stages tensors in.
//! 4. **DMA:** The block-transfer FSM moving data from external memory into a scratchpad.

/// Lazily allocated byte storage (mmap or boxed slice).
pub mod buffer;

/// DMA transfer state machine.
pub mod dma;

use serde::Deserialize;

use self::buffer::ByteBuffer;
use self::dma::{Dma, DmaStep};
use crate::common::AccelError;
use crate::config::MemoryConfig;
use crate::soc::traits::Storage;

/// Selects one of the two scratchpads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpadId {
    /// Scratchpad 0, holding convolution weights.
    Spad0,
    /// Scratchpad 1, holding activations and outputs.
    Spad1,
}

impl SpadId {
    /// Returns the scratchpad index (0 or 1).
    pub const fn index(self) -> usize {
        match self {
            Self::Spad0 => 0,
            Self::Spad1 => 1,
        }
    }
}

/// One on-chip scratchpad.
#[derive(Debug)]
pub struct Scratchpad {
    id: SpadId,
    name: &'static str,
    buffer: ByteBuffer,
}

impl Scratchpad {
    /// Creates a zeroed scratchpad of `size` bytes.
    pub fn new(id: SpadId, size: usize) -> Self {
        let name = match id {
            SpadId::Spad0 => "SPAD0",
            SpadId::Spad1 => "SPAD1",
        };
        Self {
            id,
            name,
            buffer: ByteBuffer::new(size),
        }
    }

    fn out_of_range(&self, offset: u64, len: usize) -> AccelError {
        AccelError::SpadOutOfRange {
            spad: self.id.index(),
            offset,
            len,
            capacity: self.size(),
        }
    }
}

impl Storage for Scratchpad {
    fn name(&self) -> &str {
        self.name
    }

    fn size(&self) -> u64 {
        self.buffer.len() as u64
    }

    fn read_bytes(&self, offset: u64, len: usize) -> Result<&[u8], AccelError> {
        usize::try_from(offset)
            .ok()
            .and_then(|o| self.buffer.get(o, len))
            .ok_or_else(|| self.out_of_range(offset, len))
    }

    fn write_bytes(&mut self, offset: u64, data: &[u8]) -> Result<(), AccelError> {
        let err = self.out_of_range(offset, data.len());
        usize::try_from(offset)
            .ok()
            .and_then(|o| self.buffer.write(o, data))
            .ok_or(err)
    }
}

/// The virtual external (SoC) memory.
#[derive(Debug)]
pub struct ExternalMemory {
    buffer: ByteBuffer,
}

impl ExternalMemory {
    /// Creates a zeroed external memory of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            buffer: ByteBuffer::new(size),
        }
    }

    fn out_of_range(&self, addr: u64, len: usize) -> AccelError {
        AccelError::ExternalOutOfRange {
            addr,
            len,
            size: self.size(),
        }
    }
}

impl Storage for ExternalMemory {
    fn name(&self) -> &str {
        "EXT"
    }

    fn size(&self) -> u64 {
        self.buffer.len() as u64
    }

    fn read_bytes(&self, offset: u64, len: usize) -> Result<&[u8], AccelError> {
        usize::try_from(offset)
            .ok()
            .and_then(|o| self.buffer.get(o, len))
            .ok_or_else(|| self.out_of_range(offset, len))
    }

    fn write_bytes(&mut self, offset: u64, data: &[u8]) -> Result<(), AccelError> {
        let err = self.out_of_range(offset, data.len());
        usize::try_from(offset)
            .ok()
            .and_then(|o| self.buffer.write(o, data))
            .ok_or(err)
    }
}

/// The memory subsystem: both scratchpads, external memory, and the DMA engine.
#[derive(Debug)]
pub struct Memory {
    spads: [Scratchpad; 2],
    external: ExternalMemory,
    dma: Dma,
}

impl Memory {
    /// Allocates the memories described by `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Scratchpad and external memory sizes.
    pub fn new(config: &MemoryConfig) -> Self {
        let spad = config.spad_bytes as usize;
        Self {
            spads: [
                Scratchpad::new(SpadId::Spad0, spad),
                Scratchpad::new(SpadId::Spad1, spad),
            ],
            external: ExternalMemory::new(config.external_bytes as usize),
            dma: Dma::default(),
        }
    }

    /// Returns a scratchpad.
    pub const fn spad(&self, id: SpadId) -> &Scratchpad {
        &self.spads[id.index()]
    }

    /// Returns a scratchpad mutably (backdoor staging).
    pub const fn spad_mut(&mut self, id: SpadId) -> &mut Scratchpad {
        &mut self.spads[id.index()]
    }

    /// Returns the external memory.
    pub const fn external(&self) -> &ExternalMemory {
        &self.external
    }

    /// Returns the external memory mutably (backdoor staging).
    pub const fn external_mut(&mut self) -> &mut ExternalMemory {
        &mut self.external
    }

    /// Returns the DMA engine.
    pub const fn dma(&self) -> &Dma {
        &self.dma
    }

    /// Arms a transfer of `length` blocks from external `base` into `target` at `offset`.
    ///
    /// # Errors
    ///
    /// `AccelError::DmaBusy` if a transfer is already in flight.
    pub fn arm_dma(
        &mut self,
        target: SpadId,
        offset: u64,
        base: u64,
        length: u64,
    ) -> Result<(), AccelError> {
        self.dma.arm(target, offset, base, length)
    }

    /// Advances the DMA engine by one block.
    ///
    /// # Errors
    ///
    /// Propagates out-of-range faults on either side of the copy; the transfer is dropped.
    pub fn step_dma(&mut self) -> Result<DmaStep, AccelError> {
        self.dma.step(&self.external, &mut self.spads)
    }
}
