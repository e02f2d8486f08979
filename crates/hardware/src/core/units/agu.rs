//! Address Generation Unit.
//!
//! Maps convolution loop counters to scratchpad byte offsets. Every input is zero-extended
//! to 64 bits before arithmetic, and every function is total: subtraction wraps and a
//! division by zero yields all ones, matching bit-vector semantics.

use crate::common::VECTOR_BYTES;
use crate::core::conv::params::ConvParameters;

/// Unsigned division with bit-vector semantics (`x / 0` is all ones).
const fn bv_div(num: u64, den: u64) -> u64 {
    match num.checked_div(den) {
        Some(q) => q,
        None => u64::MAX,
    }
}

/// Unsigned remainder with bit-vector semantics (`x % 0` is `x`).
pub(crate) const fn bv_rem(num: u32, den: u32) -> u32 {
    match num.checked_rem(den) {
        Some(r) => r,
        None => num,
    }
}

/// Address generator bound to one convolution's parameters.
#[derive(Clone, Copy, Debug)]
pub struct AddressGenerator<'a> {
    params: &'a ConvParameters,
}

impl<'a> AddressGenerator<'a> {
    /// Binds the generator to a parameter snapshot.
    pub const fn new(params: &'a ConvParameters) -> Self {
        Self { params }
    }

    /// Byte offset of the activation vector at (`block`, `row`, `col`).
    ///
    /// `act_base + (block * rows * cols + row * cols + col) * 16`
    pub const fn act_addr(&self, block: u32, row: u32, col: u32) -> u64 {
        let p = self.params;
        let rows = p.input.rows as u64;
        let cols = p.input.cols as u64;
        let index = (block as u64)
            .wrapping_mul(rows)
            .wrapping_mul(cols)
            .wrapping_add((row as u64).wrapping_mul(cols))
            .wrapping_add(col as u64);
        (p.act_base as u64).wrapping_add(index.wrapping_mul(VECTOR_BYTES))
    }

    /// Byte offset of the weight vector for `filter` at tap (`k_row`, `k_col`, `block`).
    ///
    /// `weight_base + (filter * KR * KC * LCB + block * KR * KC + k_row * KC + k_col) * 16`
    pub const fn weight_addr(&self, filter: u32, block: u32, k_row: u32, k_col: u32) -> u64 {
        let p = self.params;
        let kr = p.kernel_rows as u64;
        let kc = p.kernel_cols as u64;
        let kernel = kr.wrapping_mul(kc);
        let index = (filter as u64)
            .wrapping_mul(kernel)
            .wrapping_mul(p.channel_blocks() as u64)
            .wrapping_add((block as u64).wrapping_mul(kernel))
            .wrapping_add((k_row as u64).wrapping_mul(kc))
            .wrapping_add(k_col as u64);
        (p.weight_base as u64).wrapping_add(index.wrapping_mul(VECTOR_BYTES))
    }

    /// Output row reached from input `row` through kernel row `k_row`.
    pub const fn out_row(&self, row: u32, k_row: u32) -> u64 {
        bv_div(
            (row as u64).wrapping_sub(k_row as u64),
            self.params.row_stride as u64,
        )
    }

    /// Output column reached from input `col` through kernel column `k_col`.
    pub const fn out_col(&self, col: u32, k_col: u32) -> u64 {
        bv_div(
            (col as u64).wrapping_sub(k_col as u64),
            self.params.col_stride as u64,
        )
    }

    /// Byte offset of the output vector holding `filter` for the tap at (`row`, `col`, `k_row`, `k_col`).
    ///
    /// `out_base + ((filter / 8) * OR * OC + out_row * OC + out_col) * 16`
    pub const fn out_addr(&self, row: u32, col: u32, k_row: u32, k_col: u32, filter: u32) -> u64 {
        let p = self.params;
        let out_rows = p.output.rows as u64;
        let out_cols = p.output.cols as u64;
        let block = (filter / 8) as u64;
        let index = block
            .wrapping_mul(out_rows)
            .wrapping_mul(out_cols)
            .wrapping_add(self.out_row(row, k_row).wrapping_mul(out_cols))
            .wrapping_add(self.out_col(col, k_col));
        (p.out_base as u64).wrapping_add(index.wrapping_mul(VECTOR_BYTES))
    }

    /// `true` if the tap falls outside the output tensor or before the kernel origin.
    pub const fn out_of_bound(&self, row: u32, col: u32, k_row: u32, k_col: u32) -> bool {
        self.out_row(row, k_row) >= self.params.output.rows as u64
            || self.out_col(col, k_col) >= self.params.output.cols as u64
            || row < k_row
            || col < k_col
    }

    /// `true` at the final kernel tap of the final channel block.
    pub const fn is_last_tap(&self, k_row: u32, k_col: u32, block: u32) -> bool {
        let p = self.params;
        k_row as u64 == (p.kernel_rows as u64).wrapping_sub(1)
            && k_col as u64 == (p.kernel_cols as u64).wrapping_sub(1)
            && block as u64 == (p.channel_blocks() as u64).wrapping_sub(1)
    }
}
