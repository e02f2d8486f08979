//! # Scenario Tests
//!
//! Verifies JSON parsing of host scripts and their execution against a simulator.

use hlscnn_core::common::AccelError;
use hlscnn_core::sim::Scenario;
use hlscnn_core::sim::scenario::{Op, elements_to_bytes};
use hlscnn_core::soc::memory::SpadId;
use hlscnn_core::soc::registers::RegId;
use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;

#[test]
fn test_elements_are_little_endian() {
    assert_eq!(elements_to_bytes(&[0x0102, -1]), vec![0x02, 0x01, 0xFF, 0xFF]);
    assert!(elements_to_bytes(&[]).is_empty());
}

#[test]
fn test_parse_ops() {
    let scenario = Scenario::from_json(
        r#"{
            "name": "parse",
            "ops": [
                { "op": "register", "reg": "conv_trigger", "value": 1 },
                { "op": "step", "count": 3 },
                { "op": "run" },
                { "op": "run", "max_steps": 10 },
                { "op": "dump", "spad": "spad1", "offset": 32, "vectors": 2 }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(scenario.name, "parse");
    assert_eq!(scenario.ops.len(), 5);
    assert!(matches!(
        scenario.ops[0],
        Op::Register {
            reg: RegId::ConvTrigger,
            value: 1
        }
    ));
    assert!(matches!(scenario.ops[2], Op::Run { max_steps: None }));
    assert!(matches!(scenario.ops[3], Op::Run { max_steps: Some(10) }));
    assert!(matches!(
        scenario.ops[4],
        Op::Dump {
            spad: SpadId::Spad1,
            offset: 32,
            vectors: 2
        }
    ));
}

#[test]
fn test_parse_rejects_unknown_op() {
    assert!(Scenario::from_json(r#"{ "ops": [ { "op": "reset" } ] }"#).is_err());
    assert!(Scenario::from_json(r#"{ "ops": [ { "op": "register", "reg": "bogus", "value": 0 } ] }"#).is_err());
}

#[test]
fn test_dma_scenario_dumps_scratchpad() {
    let mut ctx = TestContext::new();
    // SPAD1 starts at 0x4000 + 0x10000 with the test memory sizes.
    let scenario = Scenario::from_json(
        r#"{
            "name": "dma",
            "ops": [
                { "op": "load_external", "addr": 256, "elements": [1, 2, 3, 4, 5, 6, 7, 8, -1, -2, -3, -4, -5, -6, -7, -8] },
                { "op": "register", "reg": "soc_mem_base_addr", "value": 256 },
                { "op": "register", "reg": "soc_mem_rd_wr_length", "value": 2 },
                { "op": "write", "addr": 81936, "lanes": [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0] },
                { "op": "run" },
                { "op": "dump", "spad": "spad1", "offset": 16, "vectors": 2 }
            ]
        }"#,
    )
    .unwrap();

    let dumps = scenario.execute(&mut ctx.sim).unwrap();
    assert_eq!(dumps.len(), 1);
    assert_eq!(dumps[0].spad, SpadId::Spad1);
    assert_eq!(dumps[0].offset, 16);
    assert_eq!(
        dumps[0].vectors,
        vec![[1, 2, 3, 4, 5, 6, 7, 8], [-1, -2, -3, -4, -5, -6, -7, -8]]
    );
    assert_eq!(ctx.sim.stats.dma_blocks, 2);
}

#[test]
fn test_load_spad_and_step() {
    let mut ctx = TestContext::new();
    let scenario = Scenario::from_json(
        r#"{
            "ops": [
                { "op": "load_spad", "spad": "spad0", "offset": 0, "elements": [9, 8, 7, 6, 5, 4, 3, 2] },
                { "op": "step", "count": 4 },
                { "op": "dump", "spad": "spad0", "offset": 0, "vectors": 1 }
            ]
        }"#,
    )
    .unwrap();
    let dumps = scenario.execute(&mut ctx.sim).unwrap();
    assert_eq!(dumps[0].vectors, vec![[9, 8, 7, 6, 5, 4, 3, 2]]);
    assert_eq!(ctx.sim.stats.steps, 4);
}

#[test]
fn test_first_error_stops_execution() {
    let mut ctx = TestContext::new();
    let scenario = Scenario::from_json(
        r#"{
            "ops": [
                { "op": "write", "addr": 4294967295, "lanes": [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0], "virtual_access": true },
                { "op": "register", "reg": "conv_channel", "value": 5 }
            ]
        }"#,
    )
    .unwrap();
    let err = scenario.execute(&mut ctx.sim).unwrap_err();
    assert_eq!(err, AccelError::Unmapped(0xFFFF_FFFF));
    assert_eq!(ctx.sim.accel.registers().get(RegId::ConvChannel), 0);
}
