//! Scripted host transaction sequences.
//!
//! A scenario is a JSON document listing host operations in order:
//!
//! ```json
//! {
//!   "name": "dma then conv",
//!   "ops": [
//!     { "op": "load_external", "addr": 0, "elements": [128, 256] },
//!     { "op": "register", "reg": "soc_mem_rd_wr_length", "value": 1 },
//!     { "op": "write", "addr": 16384, "lanes": [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0] },
//!     { "op": "run" },
//!     { "op": "dump", "spad": "spad0", "offset": 0, "vectors": 1 }
//!   ]
//! }
//! ```

use serde::Deserialize;
use tracing::info;

use crate::common::constants::ELEMENT_BYTES;
use crate::common::{AccelError, TX_BYTES, VECTOR_BYTES, Vector};
use crate::sim::Simulator;
use crate::soc::memory::SpadId;
use crate::soc::registers::RegId;
use crate::soc::traits::Storage;

/// One host operation.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Write a register through the config path.
    Register {
        /// Target register.
        reg: RegId,
        /// Value to write.
        value: u32,
    },
    /// Raw host write transaction.
    Write {
        /// Host address.
        addr: u64,
        /// The 16 data lanes.
        lanes: [u8; TX_BYTES],
        /// Route to external memory.
        #[serde(default)]
        virtual_access: bool,
    },
    /// Backdoor load of 16-bit elements into external memory.
    LoadExternal {
        /// Byte address.
        addr: u64,
        /// Elements, stored little-endian.
        elements: Vec<i16>,
    },
    /// Backdoor load of 16-bit elements into a scratchpad.
    LoadSpad {
        /// Target scratchpad.
        spad: SpadId,
        /// Byte offset.
        offset: u64,
        /// Elements, stored little-endian.
        elements: Vec<i16>,
    },
    /// Take exactly `count` steps.
    Step {
        /// Number of steps.
        count: u64,
    },
    /// Step until idle.
    Run {
        /// Budget override; the configured budget applies when absent.
        #[serde(default)]
        max_steps: Option<u64>,
    },
    /// Capture scratchpad vectors into the scenario output.
    Dump {
        /// Scratchpad to read.
        spad: SpadId,
        /// Byte offset of the first vector.
        offset: u64,
        /// Number of vectors.
        vectors: u64,
    },
}

/// Vectors captured by a `dump` operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dump {
    /// Scratchpad read.
    pub spad: SpadId,
    /// Byte offset of the first vector.
    pub offset: u64,
    /// Captured vectors.
    pub vectors: Vec<Vector>,
}

/// A named host script.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Scenario {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Operations in issue order.
    pub ops: Vec<Op>,
}

/// Packs 16-bit elements little-endian.
pub fn elements_to_bytes(elements: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(elements.len() * ELEMENT_BYTES);
    for element in elements {
        bytes.extend_from_slice(&element.to_le_bytes());
    }
    bytes
}

impl Scenario {
    /// Parses a scenario from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the document does not match the scenario schema.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Runs every operation against `sim`.
    ///
    /// # Returns
    ///
    /// The captures of every `dump` operation, in order.
    ///
    /// # Errors
    ///
    /// The first error raised by an operation; later operations do not run.
    pub fn execute(&self, sim: &mut Simulator) -> Result<Vec<Dump>, AccelError> {
        info!(name = %self.name, ops = self.ops.len(), "scenario start");
        let mut dumps = Vec::new();
        for op in &self.ops {
            match op {
                Op::Register { reg, value } => {
                    let _ = sim.write_register(*reg, *value)?;
                }
                Op::Write {
                    addr,
                    lanes,
                    virtual_access,
                } => {
                    let _ = sim.write(*addr, lanes, *virtual_access)?;
                }
                Op::LoadExternal { addr, elements } => {
                    sim.accel
                        .memory_mut()
                        .external_mut()
                        .write_bytes(*addr, &elements_to_bytes(elements))?;
                }
                Op::LoadSpad {
                    spad,
                    offset,
                    elements,
                } => {
                    sim.accel
                        .memory_mut()
                        .spad_mut(*spad)
                        .write_bytes(*offset, &elements_to_bytes(elements))?;
                }
                Op::Step { count } => {
                    for _ in 0..*count {
                        let _ = sim.step()?;
                    }
                }
                Op::Run { max_steps } => {
                    let _ = match max_steps {
                        Some(budget) => sim.run_until_idle(*budget)?,
                        None => sim.run()?,
                    };
                }
                Op::Dump {
                    spad,
                    offset,
                    vectors,
                } => {
                    let storage = sim.accel.memory().spad(*spad);
                    let captured = (0..*vectors)
                        .map(|i| storage.read_vector(offset + i * VECTOR_BYTES))
                        .collect::<Result<Vec<_>, _>>()?;
                    dumps.push(Dump {
                        spad: *spad,
                        offset: *offset,
                        vectors: captured,
                    });
                }
            }
        }
        Ok(dumps)
    }
}
