//! Datapath units of the convolution engine.
//!
//! This module contains the stateless functional units the engine drives each step:
//! the address generation unit and the fixed-point arithmetic unit.

/// Address Generation Unit mapping loop counters to scratchpad offsets.
pub mod agu;

/// Fixed-point MAC, narrowing, bias, and ReLU operations.
pub mod fixed;
