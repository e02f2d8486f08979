//! DMA transfer state machine.
//!
//! A host write into a scratchpad window arms the engine with the target scratchpad, the
//! trigger offset, and the external base and block count latched from the SoC memory registers.
//! Each step then copies one 16-byte block from external memory into the scratchpad until the
//! latched length is reached.

use tracing::{debug, trace, warn};

use super::{ExternalMemory, Scratchpad, SpadId};
use crate::common::constants::VECTOR_BYTES;
use crate::common::AccelError;
use crate::soc::traits::Storage;

/// Latched parameters and progress of an in-flight transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DmaState {
    /// Destination scratchpad.
    pub target: SpadId,
    /// Scratchpad byte offset of the triggering write.
    pub trigger_offset: u64,
    /// Blocks copied so far.
    pub block: u64,
    /// External source base address.
    pub base: u64,
    /// Total blocks to copy.
    pub length: u64,
}

/// Outcome of one DMA step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DmaStep {
    /// No transfer was armed.
    Idle,
    /// One block was copied and more remain.
    Copied,
    /// The transfer completed; carries the number of blocks moved.
    Finished(u64),
}

/// The DMA engine.
#[derive(Debug, Default)]
pub struct Dma {
    state: Option<DmaState>,
}

impl Dma {
    /// Returns `true` while a transfer is in flight.
    pub const fn is_busy(&self) -> bool {
        self.state.is_some()
    }

    /// Returns the in-flight transfer, if any.
    pub const fn state(&self) -> Option<&DmaState> {
        self.state.as_ref()
    }

    /// Latches a new transfer with its block counter at zero.
    ///
    /// # Errors
    ///
    /// `AccelError::DmaBusy` if a transfer is already in flight; the running one is kept.
    pub fn arm(
        &mut self,
        target: SpadId,
        trigger_offset: u64,
        base: u64,
        length: u64,
    ) -> Result<(), AccelError> {
        if let Some(running) = &self.state {
            warn!(?target, trigger_offset, ?running, "dma arm rejected");
            return Err(AccelError::DmaBusy);
        }
        debug!(?target, trigger_offset, base, length, "dma armed");
        self.state = Some(DmaState {
            target,
            trigger_offset,
            block: 0,
            base,
            length,
        });
        Ok(())
    }

    /// Copies the next block, or finishes the transfer once `length` blocks are done.
    ///
    /// A zero-length transfer finishes on its first step without copying.
    ///
    /// # Errors
    ///
    /// Out-of-range faults on either memory. The transfer is dropped so the model cannot
    /// spin on a bad descriptor.
    pub fn step(
        &mut self,
        external: &ExternalMemory,
        spads: &mut [Scratchpad; 2],
    ) -> Result<DmaStep, AccelError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(DmaStep::Idle);
        };

        if state.block >= state.length {
            let blocks = state.block;
            debug!(target = ?state.target, blocks, "dma finished");
            self.state = None;
            return Ok(DmaStep::Finished(blocks));
        }

        let src = state.base.wrapping_add(state.block * VECTOR_BYTES);
        let dst = state.trigger_offset.wrapping_add(state.block * VECTOR_BYTES);
        let copied = external
            .read_bytes(src, VECTOR_BYTES as usize)
            .and_then(|block| spads[state.target.index()].write_bytes(dst, block));
        if let Err(err) = copied {
            warn!(
                %err,
                from = external.name(),
                to = spads[state.target.index()].name(),
                "dma transfer aborted"
            );
            self.state = None;
            return Err(err);
        }

        trace!(block = state.block, src, dst, "dma block");
        state.block += 1;
        if state.block == state.length {
            let blocks = state.block;
            debug!(target = ?state.target, blocks, "dma finished");
            self.state = None;
            return Ok(DmaStep::Finished(blocks));
        }
        Ok(DmaStep::Copied)
    }
}
