//! Host interconnect address decode.
//!
//! This module routes host transactions to the accelerator's regions. It provides:
//! 1. **Masking:** The top 8 address bits select the device and are dropped.
//! 2. **Region decode:** Config window, scratchpad 0, scratchpad 1, or external memory.
//! 3. **Offsets:** Region-relative offsets for each decoded access.
//!
//! Layout of the 24-bit device window:
//!
//! | Region | Range |
//! |---|---|
//! | Config | `[0, SPAD0_BASE)` |
//! | SPAD0 | `[SPAD0_BASE, SPAD0_BASE + spad_bytes)` |
//! | SPAD1 | `[SPAD0_BASE + spad_bytes, SPAD0_BASE + 2 * spad_bytes)` |
//!
//! Virtual accesses bypass the window and address external memory with the raw address.

use crate::common::AccelError;
use crate::common::constants::{DEVICE_ADDR_MASK, SPAD0_BASE};
use crate::config::MemoryConfig;
use crate::soc::memory::SpadId;

/// Region selected by a host address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Configuration register window; carries the masked address.
    Config(u64),
    /// A scratchpad window; carries the byte offset inside the scratchpad.
    Spad(SpadId, u64),
    /// External memory; carries the raw address.
    External(u64),
}

/// Address map of one accelerator instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressMap {
    spad_bytes: u64,
    external_bytes: u64,
}

impl AddressMap {
    /// Builds the map for the configured memory sizes.
    pub const fn new(config: &MemoryConfig) -> Self {
        Self {
            spad_bytes: config.spad_bytes,
            external_bytes: config.external_bytes,
        }
    }

    /// Base address of a scratchpad window.
    pub const fn spad_base(&self, id: SpadId) -> u64 {
        match id {
            SpadId::Spad0 => SPAD0_BASE,
            SpadId::Spad1 => SPAD0_BASE + self.spad_bytes,
        }
    }

    /// First address past both scratchpad windows.
    pub const fn mem_addr_max(&self) -> u64 {
        SPAD0_BASE + 2 * self.spad_bytes
    }

    /// Decodes a host address.
    ///
    /// # Arguments
    ///
    /// * `addr` - Host address, device offset included.
    /// * `virtual_access` - Route to external memory instead of the device window.
    ///
    /// # Errors
    ///
    /// `AccelError::Unmapped` if the address falls in no region.
    pub const fn decode(&self, addr: u64, virtual_access: bool) -> Result<Target, AccelError> {
        if virtual_access {
            return if addr < self.external_bytes {
                Ok(Target::External(addr))
            } else {
                Err(AccelError::Unmapped(addr))
            };
        }
        let masked = addr & DEVICE_ADDR_MASK;
        let spad1 = self.spad_base(SpadId::Spad1);
        if masked < SPAD0_BASE {
            Ok(Target::Config(masked))
        } else if masked < spad1 {
            Ok(Target::Spad(SpadId::Spad0, masked - SPAD0_BASE))
        } else if masked < self.mem_addr_max() {
            Ok(Target::Spad(SpadId::Spad1, masked - spad1))
        } else {
            Err(AccelError::Unmapped(addr))
        }
    }
}
