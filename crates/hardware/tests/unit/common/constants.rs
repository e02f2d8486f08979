//! # Constants Tests
//!
//! Checks the relationships between the memory-map and datapath constants.

use hlscnn_core::common::constants::*;

#[test]
fn test_default_spad_geometry() {
    assert_eq!(SPAD_BYTES, 0x7F_C000);
    assert_eq!(SPAD0_BASE + 2 * SPAD_BYTES, 0xFF_C000);
    assert!(SPAD0_BASE + 2 * SPAD_BYTES <= DEVICE_WINDOW_BYTES);
}

#[test]
fn test_vector_width_matches_transaction() {
    assert_eq!(VECTOR_BYTES as usize, TX_BYTES);
    assert_eq!(VECTOR_LANES * ELEMENT_BYTES, TX_BYTES);
}

#[test]
fn test_register_slots_fit_config_window() {
    assert!(NUM_CFG_REGISTERS << CFG_REG_SIZE_BITS <= SPAD0_BASE);
    assert_eq!(CFG_LANE_MASK, 0xF);
}

#[test]
fn test_fixed_point_formats() {
    assert_eq!(WEIGHT_FRAC_BITS + ACT_FRAC_BITS - PSUM_FRAC_BITS, 5);
    assert_eq!(PSUM_FRAC_BITS - ACT_FRAC_BITS, 9);
}
