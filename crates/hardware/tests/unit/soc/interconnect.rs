//! # Interconnect Tests
//!
//! Verifies region decode for the config window, both scratchpads, external memory,
//! and unmapped addresses.

use hlscnn_core::common::AccelError;
use hlscnn_core::config::MemoryConfig;
use hlscnn_core::soc::interconnect::{AddressMap, Target};
use hlscnn_core::soc::memory::SpadId;

fn create_test_map() -> AddressMap {
    AddressMap::new(&MemoryConfig {
        spad_bytes: 0x1000,
        external_bytes: 0x2000,
    })
}

#[test]
fn test_config_window() {
    let map = create_test_map();
    assert_eq!(map.decode(0x0, false), Ok(Target::Config(0x0)));
    assert_eq!(map.decode(0x3FFF, false), Ok(Target::Config(0x3FFF)));
}

#[test]
fn test_spad_windows() {
    let map = create_test_map();
    assert_eq!(map.spad_base(SpadId::Spad0), 0x4000);
    assert_eq!(map.spad_base(SpadId::Spad1), 0x5000);
    assert_eq!(map.mem_addr_max(), 0x6000);
    assert_eq!(map.decode(0x4000, false), Ok(Target::Spad(SpadId::Spad0, 0)));
    assert_eq!(map.decode(0x4FF0, false), Ok(Target::Spad(SpadId::Spad0, 0xFF0)));
    assert_eq!(map.decode(0x5010, false), Ok(Target::Spad(SpadId::Spad1, 0x10)));
}

#[test]
fn test_device_offset_is_masked() {
    let map = create_test_map();
    assert_eq!(map.decode(0x3F00_5010, false), Ok(Target::Spad(SpadId::Spad1, 0x10)));
    assert_eq!(map.decode(0xFF00_0040, false), Ok(Target::Config(0x40)));
}

#[test]
fn test_unmapped() {
    let map = create_test_map();
    assert_eq!(map.decode(0x6000, false), Err(AccelError::Unmapped(0x6000)));
    assert_eq!(map.decode(0x2000, true), Err(AccelError::Unmapped(0x2000)));
}

#[test]
fn test_virtual_access_uses_raw_address() {
    let map = create_test_map();
    assert_eq!(map.decode(0x1FF0, true), Ok(Target::External(0x1FF0)));
    assert_eq!(map.decode(0x4000, true), Err(AccelError::Unmapped(0x4000)));
}
