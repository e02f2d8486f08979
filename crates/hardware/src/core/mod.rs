//! Accelerator compute core.
//!
//! This module contains the convolution engine, the stateless datapath units it drives,
//! and the register-interface-only fully-connected and reduction parameter decode.

/// Convolution engine (parameters, phases, and the nested state machine).
pub mod conv;

/// Fully-connected and reduction parameter decode.
pub mod params;

/// Datapath units (address generation and fixed-point arithmetic).
pub mod units;

pub use self::conv::ConvEngine;
