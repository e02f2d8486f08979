//! Convolution engine phases and architectural state.
//!
//! The engine is two cooperating state machines: the activation sweep (`ActPhase`) walks
//! filters, channel blocks, rows, and columns; the kernel sweep (`KernelPhase`) walks the
//! kernel taps reachable from the current input position and drives the datapath.

use std::fmt;

use crate::common::Vector;

/// Phases of the activation sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActPhase {
    /// Waiting for a trigger; on the first step after one, counters are cleared.
    Idle,
    /// Advance the filter counter.
    FilterId,
    /// Advance the channel-block counter.
    ChannelBlock,
    /// Advance the input-row counter.
    InputRow,
    /// Advance the input-column counter.
    InputCol,
    /// Load the activation vector for the current position.
    ActFetch,
    /// Run complete; clears the validity flag.
    Done,
}

/// Phases of the kernel sweep and datapath.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KernelPhase {
    /// Seed the kernel counters from the stride phase of the input position.
    Init,
    /// Advance the kernel row, or return to the activation sweep.
    RowFetch,
    /// Advance the kernel column, or wrap it and move to the next kernel row.
    ColFetch,
    /// Skip taps that land outside the output tensor.
    CheckBound,
    /// Load the weight vector for the current tap.
    SendToDatapath,
    /// Multiply-accumulate activation and weight vectors.
    MacPsum,
    /// Load the partial output vector.
    FetchPrevOutput,
    /// Accumulate, then apply bias and ReLU on the last tap.
    BiasRelu,
    /// Store the output vector.
    Writeback,
}

/// Current phase of the convolution engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConvPhase {
    /// Activation sweep phase.
    Act(ActPhase),
    /// Kernel sweep or datapath phase.
    Kernel(KernelPhase),
}

impl Default for ConvPhase {
    fn default() -> Self {
        Self::Act(ActPhase::Idle)
    }
}

impl fmt::Display for ConvPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Act(p) => write!(f, "act.{p:?}"),
            Self::Kernel(p) => write!(f, "kernel.{p:?}"),
        }
    }
}

/// One executed transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Phase whose action ran.
    pub from: ConvPhase,
    /// Phase entered.
    pub to: ConvPhase,
}

/// Counters and datapath registers of the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvState {
    /// Current phase.
    pub phase: ConvPhase,
    /// Output filter counter.
    pub filter: u32,
    /// Input channel-block counter.
    pub block: u32,
    /// Input row counter.
    pub row: u32,
    /// Input column counter.
    pub col: u32,
    /// Kernel row counter.
    pub k_row: u32,
    /// Kernel column counter.
    pub k_col: u32,
    /// Wide partial sum of the last MAC (Q16.16).
    pub psum: i32,
    /// The partial sum narrowed to activation width (Q9.7).
    pub act_psum: i16,
    /// Activation vector register.
    pub act: Vector,
    /// Weight vector register.
    pub weight: Vector,
    /// Output vector register.
    pub output: Vector,
}

impl ConvState {
    /// Clears counters and registers, keeping the phase.
    pub fn clear(&mut self) {
        *self = Self {
            phase: self.phase,
            ..Self::default()
        };
    }

    /// Lane of the output vector owned by the current filter.
    pub const fn lane(&self) -> usize {
        (self.filter % crate::common::VECTOR_LANES as u32) as usize
    }
}
