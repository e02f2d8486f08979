//! Simulator: owns the accelerator and its statistics side-by-side.
//!
//! Every host write and every step goes through the simulator so the counters in
//! `SimStats` stay consistent with what the model actually did.

use tracing::debug;

use crate::common::{AccelError, TX_BYTES};
use crate::config::Config;
use crate::soc::Accelerator;
use crate::soc::builder::{StepReport, WriteEffect};
use crate::soc::registers::RegId;
use crate::stats::SimStats;

/// Top-level simulator: accelerator state + statistics.
#[derive(Debug)]
pub struct Simulator {
    /// The accelerator model.
    pub accel: Accelerator,
    /// Activity counters.
    pub stats: SimStats,
    max_steps: u64,
}

impl Simulator {
    /// Creates a simulator from configuration.
    ///
    /// # Errors
    ///
    /// `AccelError::InvalidConfig` if the configuration does not validate.
    pub fn new(config: &Config) -> Result<Self, AccelError> {
        Ok(Self {
            accel: Accelerator::new(config)?,
            stats: SimStats::default(),
            max_steps: config.run.max_steps,
        })
    }

    /// Issues one host write.
    ///
    /// # Errors
    ///
    /// Propagates the accelerator's rejection; the rejection is still counted.
    pub fn write(
        &mut self,
        addr: u64,
        lanes: &[u8; TX_BYTES],
        virtual_access: bool,
    ) -> Result<WriteEffect, AccelError> {
        let result = self.accel.write(addr, lanes, virtual_access);
        self.stats.record_write(result.as_ref());
        result
    }

    /// Writes one register through the config path.
    ///
    /// # Errors
    ///
    /// Same as `write`.
    pub fn write_register(&mut self, reg: RegId, value: u32) -> Result<WriteEffect, AccelError> {
        let result = self.accel.write_register(reg, value);
        self.stats.record_write(result.as_ref());
        result
    }

    /// Advances the model by one step.
    ///
    /// # Errors
    ///
    /// Memory faults raised by the DMA or convolution engine; the step is still counted.
    pub fn step(&mut self) -> Result<StepReport, AccelError> {
        let result = self.accel.step();
        match &result {
            Ok(report) => self.stats.record_step(report),
            Err(_) => self.stats.record_fault(),
        }
        result
    }

    /// Steps until both engines are idle.
    ///
    /// # Arguments
    ///
    /// * `max_steps` - Step budget for this call.
    ///
    /// # Returns
    ///
    /// The number of steps taken.
    ///
    /// # Errors
    ///
    /// `AccelError::StepLimit` if work is still armed after `max_steps` steps, or any
    /// memory fault raised while stepping.
    pub fn run_until_idle(&mut self, max_steps: u64) -> Result<u64, AccelError> {
        let mut taken = 0;
        while !self.accel.is_idle() {
            if taken == max_steps {
                return Err(AccelError::StepLimit(max_steps));
            }
            let _ = self.step()?;
            taken += 1;
        }
        debug!(taken, "accelerator idle");
        Ok(taken)
    }

    /// Steps until idle using the configured step budget.
    ///
    /// # Errors
    ///
    /// Same as `run_until_idle`.
    pub fn run(&mut self) -> Result<u64, AccelError> {
        self.run_until_idle(self.max_steps)
    }
}
