//! Convolution Engine.
//!
//! This module implements the nested convolution state machine. It provides:
//! 1. **Parameters:** Trigger-time decode of the convolution registers (`params`).
//! 2. **State:** The two phase enums and the counter/vector registers (`state`).
//! 3. **Engine:** One transition per `step`, reading and writing the scratchpads.
//!
//! Activations and outputs live in scratchpad 1 and weights in scratchpad 0; every base
//! address is a byte offset into its scratchpad. Each output element is accumulated in place,
//! one kernel tap at a time, by reading the output vector back, updating one lane, and
//! writing it out again.

/// Convolution register decode.
pub mod params;

/// Engine phases and state.
pub mod state;

use tracing::{debug, info, trace, warn};

use self::params::ConvParameters;
use self::state::{ActPhase, ConvPhase, ConvState, KernelPhase, Transition};
use crate::common::AccelError;
use crate::core::units::agu::{AddressGenerator, bv_rem};
use crate::core::units::fixed::FixedPoint;
use crate::soc::memory::{Memory, SpadId};
use crate::soc::traits::Storage;

/// The convolution engine: latched parameters, architectural state, and the validity flag.
#[derive(Clone, Debug, Default)]
pub struct ConvEngine {
    params: ConvParameters,
    state: ConvState,
    valid: bool,
}

impl ConvEngine {
    /// Creates an idle, unarmed engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a convolution is in flight.
    pub const fn is_armed(&self) -> bool {
        self.valid
    }

    /// Returns the parameters of the current (or last) run.
    pub const fn params(&self) -> &ConvParameters {
        &self.params
    }

    /// Returns the engine's counters and registers.
    pub const fn state(&self) -> &ConvState {
        &self.state
    }

    /// Latches `params` and arms the engine at `Idle`.
    ///
    /// # Errors
    ///
    /// * `AccelError::ConvBusy` if a run is in flight; nothing changes.
    /// * `AccelError::ZeroStride` if either stride is zero; the engine stays unarmed.
    pub fn arm(&mut self, params: ConvParameters) -> Result<(), AccelError> {
        if self.valid {
            warn!(phase = %self.state.phase, "conv trigger while armed");
            return Err(AccelError::ConvBusy);
        }
        if params.row_stride == 0 || params.col_stride == 0 {
            warn!(row = params.row_stride, col = params.col_stride, "conv trigger with zero stride");
            return Err(AccelError::ZeroStride {
                row: params.row_stride,
                col: params.col_stride,
            });
        }
        debug!(?params, "conv armed");
        self.params = params;
        self.state = ConvState::default();
        self.valid = true;
        Ok(())
    }

    /// Executes the current phase and moves to the next one.
    ///
    /// # Returns
    ///
    /// The transition taken, or `None` if the engine is not armed.
    ///
    /// # Errors
    ///
    /// Scratchpad faults from vector loads and stores. The run is abandoned and the engine
    /// disarmed.
    pub fn step(&mut self, memory: &mut Memory) -> Result<Option<Transition>, AccelError> {
        if !self.valid {
            return Ok(None);
        }
        let from = self.state.phase;
        let to = match from {
            ConvPhase::Act(phase) => self.act_step(phase, memory),
            ConvPhase::Kernel(phase) => self.kernel_step(phase, memory),
        };
        let to = match to {
            Ok(to) => to,
            Err(err) => {
                warn!(%from, %err, "conv run aborted");
                self.valid = false;
                self.state.phase = ConvPhase::default();
                return Err(err);
            }
        };
        let s = &self.state;
        trace!(
            %from, %to, filter = s.filter, block = s.block, row = s.row, col = s.col,
            k_row = s.k_row, k_col = s.k_col, "conv transition"
        );
        self.state.phase = to;
        Ok(Some(Transition { from, to }))
    }

    fn act_step(&mut self, phase: ActPhase, memory: &Memory) -> Result<ConvPhase, AccelError> {
        let p = self.params;
        let s = &mut self.state;
        let next = match phase {
            ActPhase::Idle => {
                s.clear();
                let empty = p.filter_count == 0
                    || p.channel_blocks() == 0
                    || p.input.rows == 0
                    || p.input.cols == 0;
                if empty { ActPhase::Done } else { ActPhase::ActFetch }
            }
            ActPhase::ActFetch => {
                let addr = AddressGenerator::new(&p).act_addr(s.block, s.row, s.col);
                s.act = memory.spad(SpadId::Spad1).read_vector(addr)?;
                return Ok(ConvPhase::Kernel(KernelPhase::Init));
            }
            ActPhase::InputCol => {
                s.col += 1;
                if s.col >= p.input.cols { ActPhase::InputRow } else { ActPhase::ActFetch }
            }
            ActPhase::InputRow => {
                s.col = 0;
                s.row += 1;
                if s.row >= p.input.rows { ActPhase::ChannelBlock } else { ActPhase::ActFetch }
            }
            ActPhase::ChannelBlock => {
                s.row = 0;
                s.block += 1;
                if s.block >= p.channel_blocks() {
                    ActPhase::FilterId
                } else {
                    ActPhase::ActFetch
                }
            }
            ActPhase::FilterId => {
                s.block = 0;
                s.filter += 1;
                if s.filter >= p.filter_count { ActPhase::Done } else { ActPhase::ActFetch }
            }
            ActPhase::Done => {
                info!(filters = p.filter_count, "conv done");
                self.valid = false;
                ActPhase::Idle
            }
        };
        Ok(ConvPhase::Act(next))
    }

    fn kernel_step(
        &mut self,
        phase: KernelPhase,
        memory: &mut Memory,
    ) -> Result<ConvPhase, AccelError> {
        let p = self.params;
        let agu = AddressGenerator::new(&p);
        let s = &mut self.state;
        let next = match phase {
            KernelPhase::Init => {
                s.k_row = bv_rem(s.row, p.row_stride);
                s.k_col = bv_rem(s.col, p.col_stride);
                if s.k_row >= p.kernel_rows || s.k_col >= p.kernel_cols {
                    return Ok(ConvPhase::Act(ActPhase::InputCol));
                }
                KernelPhase::CheckBound
            }
            KernelPhase::ColFetch => {
                if s.k_col.saturating_add(p.col_stride) >= p.kernel_cols {
                    s.k_col = bv_rem(s.col, p.col_stride);
                    KernelPhase::RowFetch
                } else {
                    s.k_col += p.col_stride;
                    KernelPhase::CheckBound
                }
            }
            KernelPhase::RowFetch => {
                if s.k_row.saturating_add(p.row_stride) >= p.kernel_rows {
                    return Ok(ConvPhase::Act(ActPhase::InputCol));
                }
                s.k_row += p.row_stride;
                KernelPhase::CheckBound
            }
            KernelPhase::CheckBound => {
                if agu.out_of_bound(s.row, s.col, s.k_row, s.k_col) {
                    KernelPhase::ColFetch
                } else {
                    KernelPhase::SendToDatapath
                }
            }
            KernelPhase::SendToDatapath => {
                let addr = agu.weight_addr(s.filter, s.block, s.k_row, s.k_col);
                s.weight = memory.spad(SpadId::Spad0).read_vector(addr)?;
                KernelPhase::MacPsum
            }
            KernelPhase::MacPsum => {
                s.psum = FixedPoint::dot(0, &s.weight, &s.act);
                s.act_psum = FixedPoint::psum_to_act(s.psum);
                KernelPhase::FetchPrevOutput
            }
            KernelPhase::FetchPrevOutput => {
                let addr = agu.out_addr(s.row, s.col, s.k_row, s.k_col, s.filter);
                s.output = memory.spad(SpadId::Spad1).read_vector(addr)?;
                KernelPhase::BiasRelu
            }
            KernelPhase::BiasRelu => {
                let lane = s.lane();
                let first = s.k_row == 0 && s.k_col == 0 && s.block == 0;
                let start = if first && !p.enable_accumulate {
                    0
                } else {
                    s.output[lane]
                };
                let mut acc = FixedPoint::act_add(start, s.act_psum);
                if agu.is_last_tap(s.k_row, s.k_col, s.block) {
                    if p.enable_bias {
                        acc = FixedPoint::bias_add(acc, p.bias);
                    }
                    if p.enable_relu {
                        acc = FixedPoint::relu(acc);
                    }
                }
                s.output[lane] = FixedPoint::psum_to_act(acc);
                KernelPhase::Writeback
            }
            KernelPhase::Writeback => {
                let addr = agu.out_addr(s.row, s.col, s.k_row, s.k_col, s.filter);
                memory.spad_mut(SpadId::Spad1).write_vector(addr, &s.output)?;
                KernelPhase::ColFetch
            }
        };
        Ok(ConvPhase::Kernel(next))
    }
}
