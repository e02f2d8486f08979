//! Simulation statistics collection and reporting.
//!
//! This module tracks activity counters for the accelerator model. It provides:
//! 1. **Summary:** Total steps, faulted steps, host seconds, and step rate.
//! 2. **Convolution:** Runs, transitions, activation fetches, taps checked and skipped, MACs, writebacks.
//! 3. **DMA:** Transfers completed and blocks moved.
//! 4. **Host:** Register writes, triggers accepted and rejected, external writes.

use std::time::Instant;

use crate::core::conv::state::{ActPhase, ConvPhase, KernelPhase, Transition};
use crate::soc::builder::{StepReport, WriteEffect};
use crate::soc::memory::dma::DmaStep;

/// Accelerator statistics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total model steps taken.
    pub steps: u64,
    /// Steps on which an engine faulted.
    pub faults: u64,

    /// Convolution runs completed.
    pub conv_runs: u64,
    /// Convolution engine transitions executed.
    pub conv_transitions: u64,
    /// Activation vectors fetched.
    pub act_fetches: u64,
    /// Kernel taps evaluated by `CheckBound`.
    pub taps_checked: u64,
    /// Kernel taps skipped as out of bound.
    pub taps_skipped: u64,
    /// Vector MACs issued to the datapath.
    pub macs: u64,
    /// Output vectors written back.
    pub writebacks: u64,

    /// DMA transfers completed.
    pub dma_transfers: u64,
    /// 16-byte blocks moved by DMA.
    pub dma_blocks: u64,

    /// Plain register writes.
    pub config_writes: u64,
    /// Convolution triggers accepted.
    pub conv_triggers: u64,
    /// FC and reduction parameter latches.
    pub aux_triggers: u64,
    /// Host writes rejected with an error.
    pub rejected_writes: u64,
    /// Writes into external memory.
    pub external_writes: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            steps: 0,
            faults: 0,
            conv_runs: 0,
            conv_transitions: 0,
            act_fetches: 0,
            taps_checked: 0,
            taps_skipped: 0,
            macs: 0,
            writebacks: 0,
            dma_transfers: 0,
            dma_blocks: 0,
            config_writes: 0,
            conv_triggers: 0,
            aux_triggers: 0,
            rejected_writes: 0,
            external_writes: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "conv", "dma", "host"];

impl SimStats {
    /// Records the outcome of one step.
    pub fn record_step(&mut self, report: &StepReport) {
        self.steps += 1;
        match report.dma {
            DmaStep::Idle => {}
            DmaStep::Copied => self.dma_blocks += 1,
            DmaStep::Finished(blocks) => {
                self.dma_transfers += 1;
                if blocks > 0 {
                    self.dma_blocks += 1;
                }
            }
        }
        if let Some(transition) = &report.conv {
            self.record_transition(transition);
        }
    }

    fn record_transition(&mut self, transition: &Transition) {
        self.conv_transitions += 1;
        match (transition.from, transition.to) {
            (ConvPhase::Act(ActPhase::ActFetch), _) => self.act_fetches += 1,
            (ConvPhase::Kernel(KernelPhase::CheckBound), to) => {
                self.taps_checked += 1;
                if to == ConvPhase::Kernel(KernelPhase::ColFetch) {
                    self.taps_skipped += 1;
                }
            }
            (ConvPhase::Kernel(KernelPhase::MacPsum), _) => self.macs += 1,
            (ConvPhase::Kernel(KernelPhase::Writeback), _) => self.writebacks += 1,
            (ConvPhase::Act(ActPhase::Done), _) => self.conv_runs += 1,
            _ => {}
        }
    }

    /// Records a step that ended in an engine fault.
    pub const fn record_fault(&mut self) {
        self.steps += 1;
        self.faults += 1;
    }

    /// Records the outcome of one host write.
    pub fn record_write<E>(&mut self, result: Result<&WriteEffect, E>) {
        match result {
            Ok(WriteEffect::Register(_)) => self.config_writes += 1,
            Ok(WriteEffect::ConvArmed(_)) => self.conv_triggers += 1,
            Ok(WriteEffect::FcLatched(_) | WriteEffect::ReductionLatched(_)) => {
                self.aux_triggers += 1;
            }
            Ok(WriteEffect::DmaArmed { .. }) => {}
            Ok(WriteEffect::External(_)) => self.external_writes += 1,
            Err(_) => self.rejected_writes += 1,
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();

        if want("summary") {
            let rate = if seconds > 0.0 {
                self.steps as f64 / seconds / 1_000_000.0
            } else {
                0.0
            };
            println!("\n==========================================================");
            println!("HLSCNN ACCELERATOR STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_steps                {}", self.steps);
            println!("sim_faults               {}", self.faults);
            println!("sim_msteps_per_sec       {rate:.2}");
            println!("----------------------------------------------------------");
        }
        if want("conv") {
            let checked = self.taps_checked.max(1);
            println!("CONVOLUTION");
            println!("  runs                   {}", self.conv_runs);
            println!("  transitions            {}", self.conv_transitions);
            println!("  act_fetches            {}", self.act_fetches);
            println!("  taps.checked           {}", self.taps_checked);
            println!(
                "  taps.skipped           {} ({:.2}%)",
                self.taps_skipped,
                (self.taps_skipped as f64 / checked as f64) * 100.0
            );
            println!("  macs                   {}", self.macs);
            println!("  writebacks             {}", self.writebacks);
            println!("----------------------------------------------------------");
        }
        if want("dma") {
            println!("DMA");
            println!("  transfers              {}", self.dma_transfers);
            println!("  blocks                 {}", self.dma_blocks);
            println!("  bytes                  {}", self.dma_blocks * 16);
            println!("----------------------------------------------------------");
        }
        if want("host") {
            println!("HOST");
            println!("  config_writes          {}", self.config_writes);
            println!("  conv_triggers          {}", self.conv_triggers);
            println!("  aux_triggers           {}", self.aux_triggers);
            println!("  rejected_writes        {}", self.rejected_writes);
            println!("  external_writes        {}", self.external_writes);
            println!("==========================================================");
        }
    }
}
