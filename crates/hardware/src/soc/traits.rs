//! Storage trait for byte-addressed memories.
//!
//! This module defines the `Storage` trait implemented by the scratchpads and the external memory.
//! It provides:
//! 1. **Identification:** `name` and `size` for logging and range checks.
//! 2. **Access:** Checked byte-slice reads and writes at storage-relative offsets.
//! 3. **Vectors:** Little-endian 8-lane vector loads and stores built on the byte access.
//!
//! All implementors must be `Send + Sync` so a model can be moved across threads.

use crate::common::constants::{ELEMENT_BYTES, VECTOR_BYTES};
use crate::common::{AccelError, Vector};

/// A fixed-size byte-addressed memory.
pub trait Storage: Send + Sync {
    /// Returns a short name for this storage (e.g., `"SPAD0"`, `"EXT"`).
    fn name(&self) -> &str;

    /// Returns the capacity in bytes.
    fn size(&self) -> u64;

    /// Reads `len` bytes at `offset`.
    ///
    /// # Errors
    ///
    /// Returns the implementor's out-of-range error if the access leaves the storage.
    fn read_bytes(&self, offset: u64, len: usize) -> Result<&[u8], AccelError>;

    /// Writes `data` at `offset`; nothing is written if the access leaves the storage.
    ///
    /// # Errors
    ///
    /// Returns the implementor's out-of-range error if the access leaves the storage.
    fn write_bytes(&mut self, offset: u64, data: &[u8]) -> Result<(), AccelError>;

    /// Loads one 8-lane vector; element `i` is the little-endian pair at `offset + 2i`.
    ///
    /// # Errors
    ///
    /// Fails if the 16-byte range leaves the storage.
    fn read_vector(&self, offset: u64) -> Result<Vector, AccelError> {
        let bytes = self.read_bytes(offset, VECTOR_BYTES as usize)?;
        let mut out = Vector::default();
        for (lane, pair) in out.iter_mut().zip(bytes.chunks_exact(ELEMENT_BYTES)) {
            *lane = i16::from_le_bytes([pair[0], pair[1]]);
        }
        Ok(out)
    }

    /// Stores one 8-lane vector in the layout read by `read_vector`.
    ///
    /// # Errors
    ///
    /// Fails if the 16-byte range leaves the storage.
    fn write_vector(&mut self, offset: u64, vector: &Vector) -> Result<(), AccelError> {
        let mut bytes = [0u8; VECTOR_BYTES as usize];
        for (pair, lane) in bytes.chunks_exact_mut(ELEMENT_BYTES).zip(vector) {
            pair.copy_from_slice(&lane.to_le_bytes());
        }
        self.write_bytes(offset, &bytes)
    }
}
