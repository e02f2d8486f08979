//! # Address Generator Tests
//!
//! Verifies the activation, weight, and output address formulas, the bound and
//! last-tap predicates, and the totality of the arithmetic.

use hlscnn_core::core::conv::params::{ConvParameters, TensorShape};
use hlscnn_core::core::units::agu::AddressGenerator;
use proptest::prelude::*;
use rstest::rstest;

fn create_test_params() -> ConvParameters {
    ConvParameters {
        input: TensorShape {
            rows: 6,
            cols: 5,
            chans: 20,
        },
        output: TensorShape {
            rows: 4,
            cols: 3,
            chans: 10,
        },
        kernel_rows: 3,
        kernel_cols: 3,
        row_stride: 1,
        col_stride: 1,
        filter_count: 10,
        act_base: 0x100,
        weight_base: 0x200,
        out_base: 0x4000,
        ..ConvParameters::default()
    }
}

// ══════════════════════════════════════════════════════════
// 1. Address formulas
// ══════════════════════════════════════════════════════════

#[test]
fn test_act_addr_formula() {
    let p = create_test_params();
    let agu = AddressGenerator::new(&p);
    assert_eq!(agu.act_addr(0, 0, 0), 0x100);
    // (2 * 6 * 5 + 3 * 5 + 4) * 16
    assert_eq!(agu.act_addr(2, 3, 4), 0x100 + (60 + 15 + 4) * 16);
}

#[test]
fn test_weight_addr_formula() {
    let p = create_test_params();
    let agu = AddressGenerator::new(&p);
    assert_eq!(p.channel_blocks(), 3);
    // (f * 9 * 3 + blk * 9 + kr * 3 + kc) * 16
    assert_eq!(agu.weight_addr(1, 2, 1, 2), 0x200 + (27 + 18 + 3 + 2) * 16);
    assert_eq!(agu.weight_addr(0, 0, 0, 0), 0x200);
}

#[test]
fn test_out_addr_formula() {
    let p = create_test_params();
    let agu = AddressGenerator::new(&p);
    // filter 9 -> output block 1; row 3 - k 1 = out row 2; col 4 - k 2 = out col 2
    assert_eq!(agu.out_addr(3, 4, 1, 2, 9), 0x4000 + (12 + 2 * 3 + 2) * 16);
    // Filters in the same block of 8 share an address.
    assert_eq!(agu.out_addr(3, 4, 1, 2, 0), agu.out_addr(3, 4, 1, 2, 7));
}

#[test]
fn test_out_addr_with_stride() {
    let mut p = create_test_params();
    p.row_stride = 2;
    p.col_stride = 2;
    let agu = AddressGenerator::new(&p);
    assert_eq!(agu.out_row(4, 0), 2);
    assert_eq!(agu.out_col(3, 1), 1);
    assert_eq!(agu.out_addr(4, 3, 0, 1, 0), 0x4000 + (2 * 3 + 1) * 16);
}

// ══════════════════════════════════════════════════════════
// 2. Predicates
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0, 0, 0, 0, false)]
#[case(0, 0, 1, 0, true)] // row < k_row
#[case(0, 1, 0, 2, true)] // col < k_col
#[case(5, 0, 1, 0, true)] // out row 4 >= 4
#[case(5, 2, 2, 0, false)] // out (3, 2)
#[case(4, 3, 0, 0, true)] // out row 4 >= 4
#[case(2, 4, 0, 1, true)] // out col 3 >= 3
fn test_out_of_bound(
    #[case] row: u32,
    #[case] col: u32,
    #[case] k_row: u32,
    #[case] k_col: u32,
    #[case] expected: bool,
) {
    let p = create_test_params();
    let agu = AddressGenerator::new(&p);
    assert_eq!(agu.out_of_bound(row, col, k_row, k_col), expected);
}

#[test]
fn test_is_last_tap() {
    let p = create_test_params();
    let agu = AddressGenerator::new(&p);
    assert!(agu.is_last_tap(2, 2, 2));
    assert!(!agu.is_last_tap(2, 2, 1));
    assert!(!agu.is_last_tap(1, 2, 2));
    assert!(!agu.is_last_tap(2, 1, 2));
}

// ══════════════════════════════════════════════════════════
// 3. Totality
// ══════════════════════════════════════════════════════════

#[test]
fn test_zero_stride_division_is_all_ones() {
    let mut p = create_test_params();
    p.row_stride = 0;
    let agu = AddressGenerator::new(&p);
    assert_eq!(agu.out_row(3, 1), u64::MAX);
    assert!(agu.out_of_bound(3, 1, 1, 0));
}

#[test]
fn test_zero_kernel_never_last_tap() {
    let mut p = create_test_params();
    p.kernel_rows = 0;
    let agu = AddressGenerator::new(&p);
    assert!(!agu.is_last_tap(0, 2, 2));
}

proptest! {
    #[test]
    fn prop_addresses_are_deterministic(
        rows in 0u32..1024, cols in 0u32..1024, chans in 0u32..4096,
        kr in 0u32..256, kc in 0u32..256, rs in 0u32..8, cs in 0u32..8,
        filters in 0u32..4096,
        row in 0u32..1024, col in 0u32..1024, blk in 0u32..512,
        k_row in 0u32..256, k_col in 0u32..256, f in 0u32..4096,
    ) {
        let p = ConvParameters {
            input: TensorShape { rows, cols, chans },
            output: TensorShape { rows: rows / 2, cols: cols / 2, chans: filters },
            kernel_rows: kr,
            kernel_cols: kc,
            row_stride: rs,
            col_stride: cs,
            filter_count: filters,
            act_base: 0x40,
            weight_base: 0x80,
            out_base: 0xC0,
            ..ConvParameters::default()
        };
        let a = AddressGenerator::new(&p);
        let b = AddressGenerator::new(&p);
        prop_assert_eq!(a.act_addr(blk, row, col), b.act_addr(blk, row, col));
        prop_assert_eq!(a.weight_addr(f, blk, k_row, k_col), b.weight_addr(f, blk, k_row, k_col));
        prop_assert_eq!(a.out_addr(row, col, k_row, k_col, f), b.out_addr(row, col, k_row, k_col, f));
        prop_assert_eq!(a.out_of_bound(row, col, k_row, k_col), b.out_of_bound(row, col, k_row, k_col));
        prop_assert_eq!(a.is_last_tap(k_row, k_col, blk), b.is_last_tap(k_row, k_col, blk));
    }

    #[test]
    fn prop_act_addr_is_16_byte_strided(row in 0u32..64, col in 0u32..63, blk in 0u32..8) {
        let p = create_test_params();
        let agu = AddressGenerator::new(&p);
        prop_assert_eq!(agu.act_addr(blk, row, col + 1) - agu.act_addr(blk, row, col), 16);
    }
}
