//! # DMA Tests
//!
//! Verifies that a scratchpad-window write arms a block transfer from external memory and
//! that each step moves exactly one 16-byte block.

use hlscnn_core::common::AccelError;
use hlscnn_core::common::constants::SPAD0_BASE;
use hlscnn_core::core::conv::state::{ActPhase, ConvPhase};
use hlscnn_core::soc::builder::WriteEffect;
use hlscnn_core::soc::memory::SpadId;
use hlscnn_core::soc::memory::dma::DmaStep;
use hlscnn_core::soc::registers::RegId;
use hlscnn_core::soc::traits::Storage;
use pretty_assertions::assert_eq;

use crate::common::harness::{ConvProblem, TEST_EXTERNAL_BYTES, TEST_SPAD_BYTES, TestContext};

fn stage_external(ctx: &mut TestContext, base: u64, blocks: u64) -> Vec<u8> {
    let data: Vec<u8> = (0..blocks * 16).map(|i| (i * 7 + 3) as u8).collect();
    ctx.sim
        .accel
        .memory_mut()
        .external_mut()
        .write_bytes(base, &data)
        .unwrap();
    data
}

fn arm(ctx: &mut TestContext, base: u32, length: u32, addr: u64) -> Result<WriteEffect, AccelError> {
    let _ = ctx.sim.write_register(RegId::SocMemBaseAddr, base).unwrap();
    let _ = ctx.sim.write_register(RegId::SocMemRdWrLength, length).unwrap();
    ctx.sim.write(addr, &[0xEE; 16], false)
}

#[test]
fn test_five_block_transfer_into_spad1() {
    let mut ctx = TestContext::new();
    let data = stage_external(&mut ctx, 0x100, 5);
    let spad1 = SPAD0_BASE + TEST_SPAD_BYTES;

    let effect = arm(&mut ctx, 0x100, 5, spad1 + 0x40).unwrap();
    assert_eq!(
        effect,
        WriteEffect::DmaArmed {
            target: SpadId::Spad1,
            offset: 0x40
        }
    );
    let state = *ctx.sim.accel.memory().dma().state().unwrap();
    assert_eq!(state.block, 0);
    assert_eq!(state.length, 5);

    for _ in 0..4 {
        assert_eq!(ctx.sim.step().unwrap().dma, DmaStep::Copied);
    }
    assert_eq!(ctx.sim.step().unwrap().dma, DmaStep::Finished(5));
    assert!(ctx.sim.accel.is_idle());

    let spad = ctx.sim.accel.memory().spad(SpadId::Spad1);
    assert_eq!(spad.read_bytes(0x40, 80).unwrap(), data.as_slice());
    // The write's own data lanes are not stored.
    assert_eq!(spad.read_bytes(0x30, 16).unwrap(), &[0u8; 16]);
    assert_eq!(spad.read_bytes(0x90, 16).unwrap(), &[0u8; 16]);
    assert_eq!(ctx.sim.stats.dma_transfers, 1);
    assert_eq!(ctx.sim.stats.dma_blocks, 5);
}

#[test]
fn test_transfer_into_spad0() {
    let mut ctx = TestContext::new();
    let data = stage_external(&mut ctx, 0, 2);
    let _ = arm(&mut ctx, 0, 2, SPAD0_BASE).unwrap();
    assert_eq!(ctx.sim.run().unwrap(), 2);
    let spad = ctx.sim.accel.memory().spad(SpadId::Spad0);
    assert_eq!(spad.read_bytes(0, 32).unwrap(), data.as_slice());
}

#[test]
fn test_zero_length_finishes_without_copy() {
    let mut ctx = TestContext::new();
    let _ = stage_external(&mut ctx, 0, 1);
    let _ = arm(&mut ctx, 0, 0, SPAD0_BASE).unwrap();
    assert_eq!(ctx.sim.step().unwrap().dma, DmaStep::Finished(0));
    let spad = ctx.sim.accel.memory().spad(SpadId::Spad0);
    assert_eq!(spad.read_bytes(0, 16).unwrap(), &[0u8; 16]);
    assert_eq!(ctx.sim.stats.dma_blocks, 0);
}

#[test]
fn test_rearm_while_busy_is_rejected() {
    let mut ctx = TestContext::new();
    let _ = arm(&mut ctx, 0, 3, SPAD0_BASE).unwrap();
    let err = ctx.sim.write(SPAD0_BASE + 0x100, &[0; 16], false).unwrap_err();
    assert_eq!(err, AccelError::DmaBusy);

    let state = *ctx.sim.accel.memory().dma().state().unwrap();
    assert_eq!(state.trigger_offset, 0);
    assert_eq!(ctx.sim.stats.rejected_writes, 1);
}

#[test]
fn test_external_fault_drops_transfer() {
    let mut ctx = TestContext::new();
    let base = (TEST_EXTERNAL_BYTES - 16) as u32;
    let _ = arm(&mut ctx, base, 2, SPAD0_BASE).unwrap();

    assert_eq!(ctx.sim.step().unwrap().dma, DmaStep::Copied);
    let err = ctx.sim.step().unwrap_err();
    assert_eq!(
        err,
        AccelError::ExternalOutOfRange {
            addr: TEST_EXTERNAL_BYTES,
            len: 16,
            size: TEST_EXTERNAL_BYTES
        }
    );
    assert!(!ctx.sim.accel.memory().dma().is_busy());
}

#[test]
fn test_scratchpad_fault_drops_transfer() {
    let mut ctx = TestContext::new();
    let last = SPAD0_BASE + TEST_SPAD_BYTES - 16;
    let _ = arm(&mut ctx, 0, 2, last).unwrap();

    assert_eq!(ctx.sim.step().unwrap().dma, DmaStep::Copied);
    let err = ctx.sim.step().unwrap_err();
    assert!(matches!(err, AccelError::SpadOutOfRange { spad: 0, .. }));
    assert!(ctx.sim.accel.is_idle());
}

#[test]
fn test_host_staged_transfer_round_trip() {
    let mut ctx = TestContext::new();
    let blocks: Vec<[u8; 16]> = (0..4u8)
        .map(|b| std::array::from_fn(|i| b * 16 + i as u8 + 1))
        .collect();
    for (n, block) in blocks.iter().enumerate() {
        let effect = ctx.sim.write(0x200 + n as u64 * 16, block, true).unwrap();
        assert_eq!(effect, WriteEffect::External(0x200 + n as u64 * 16));
    }

    let spad1 = SPAD0_BASE + TEST_SPAD_BYTES;
    let _ = arm(&mut ctx, 0x200, 4, spad1 + 0x80).unwrap();
    assert_eq!(ctx.sim.run_until_idle(10).unwrap(), 4);

    let expected = blocks.concat();
    let spad = ctx.sim.accel.memory().spad(SpadId::Spad1);
    assert_eq!(spad.read_bytes(0x80, 64).unwrap(), expected.as_slice());
    for (n, block) in blocks.iter().enumerate() {
        assert_eq!(&ctx.sim.accel.read(spad1 + 0x80 + n as u64 * 16, false).unwrap(), block);
    }
    assert_eq!(ctx.sim.stats.external_writes, 4);
}

#[test]
fn test_dma_fault_still_advances_conv() {
    let mut ctx = TestContext::new();
    let problem = ConvProblem::new(8, 3, 3, 1, 1, 1);
    let _ = ctx.program_conv(&problem.params).unwrap();
    let _ = arm(&mut ctx, TEST_EXTERNAL_BYTES as u32, 1, SPAD0_BASE).unwrap();

    let err = ctx.sim.step().unwrap_err();
    assert!(matches!(err, AccelError::ExternalOutOfRange { .. }));
    assert!(!ctx.sim.accel.memory().dma().is_busy());
    assert_eq!(
        ctx.sim.accel.conv().state().phase,
        ConvPhase::Act(ActPhase::ActFetch)
    );
    assert_eq!(ctx.sim.stats.steps, 1);
    assert_eq!(ctx.sim.stats.faults, 1);

    let _ = ctx.sim.run().unwrap();
    assert_eq!(ctx.sim.stats.conv_runs, 1);
}
