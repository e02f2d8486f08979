//! Simulation driver and host scripts.
//!
//! Provides the `Simulator` wrapper that keeps statistics alongside the accelerator,
//! and JSON scenarios describing host transaction sequences.

/// Scripted host transaction sequences.
pub mod scenario;

/// Accelerator plus statistics.
pub mod simulator;

pub use scenario::Scenario;
pub use simulator::Simulator;
