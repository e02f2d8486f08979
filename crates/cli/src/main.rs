//! HLSCNN accelerator model CLI.
//!
//! This binary drives the accelerator model from the command line. It performs:
//! 1. **Scenario run:** Execute a JSON host script and print every captured scratchpad dump.
//! 2. **Memory map:** Print the decoded address map and register slots for a configuration.

use std::fs;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hlscnn_core::config::Config;
use hlscnn_core::sim::scenario::Dump;
use hlscnn_core::sim::{Scenario, Simulator};
use hlscnn_core::soc::interconnect::AddressMap;
use hlscnn_core::soc::memory::SpadId;
use hlscnn_core::soc::registers::RegId;

#[derive(Parser, Debug)]
#[command(
    name = "hlscnn-sim",
    author,
    version,
    about = "HLSCNN convolution accelerator model",
    long_about = "Run host transaction scripts against the HLSCNN accelerator model.\n\nExamples:\n  hlscnn-sim run --scenario conv3x3.json --stats\n  hlscnn-sim run --scenario dma.json --config small.json --max-steps 1000\n  hlscnn-sim map --config small.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a JSON scenario.
    Run {
        /// Scenario file.
        #[arg(short, long)]
        scenario: String,

        /// Configuration file (JSON); built-in defaults when absent.
        #[arg(short, long)]
        config: Option<String>,

        /// Override the step budget for `run` operations without one.
        #[arg(long)]
        max_steps: Option<u64>,

        /// Print statistics; optionally restrict to named sections (summary, conv, dma, host).
        #[arg(long, num_args = 0.., value_delimiter = ',')]
        stats: Option<Vec<String>>,
    },

    /// Print the address map and register slots.
    Map {
        /// Configuration file (JSON); built-in defaults when absent.
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            max_steps,
            stats,
        } => cmd_run(&scenario, config.as_deref(), max_steps, stats.as_deref()),
        Commands::Map { config } => {
            let config = load_config(config.as_deref());
            init_tracing(&config);
            cmd_map(&config);
        }
    }
}

/// Loads and validates the configuration, exiting with code 1 on any error.
fn load_config(path: Option<&str>) -> Config {
    let config = path.map_or_else(Config::default, |path| {
        let text = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading config {path}: {e}");
            process::exit(1);
        });
        serde_json::from_str(&text).unwrap_or_else(|e| {
            eprintln!("Error parsing config {path}: {e}");
            process::exit(1);
        })
    });
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    config
}

/// Installs the fmt subscriber; `RUST_LOG` wins, then `trace_transitions`, then `info`.
fn init_tracing(config: &Config) {
    let fallback = if config.general.trace_transitions {
        "trace"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs a scenario and prints its dumps; exits with code 1 on any model error.
fn cmd_run(path: &str, config: Option<&str>, max_steps: Option<u64>, stats: Option<&[String]>) {
    let mut config = load_config(config);
    if let Some(budget) = max_steps {
        config.run.max_steps = budget;
    }
    init_tracing(&config);

    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading scenario {path}: {e}");
        process::exit(1);
    });
    let scenario = Scenario::from_json(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing scenario {path}: {e}");
        process::exit(1);
    });

    let mut sim = Simulator::new(&config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    println!("[*] Scenario: {} ({} ops)", scenario.name, scenario.ops.len());
    let result = scenario.execute(&mut sim);

    if let Some(sections) = stats {
        sim.stats.print_sections(sections);
    }

    match result {
        Ok(dumps) => dumps.iter().for_each(print_dump),
        Err(e) => {
            eprintln!("\n[!] MODEL ERROR: {e}");
            process::exit(1);
        }
    }
}

/// Prints one dump as hex, one vector per line.
fn print_dump(dump: &Dump) {
    let name = match dump.spad {
        SpadId::Spad0 => "spad0",
        SpadId::Spad1 => "spad1",
    };
    println!("\n[*] {name} @ {:#x}", dump.offset);
    for (i, vector) in dump.vectors.iter().enumerate() {
        let lanes: Vec<String> = vector.iter().map(|v| format!("{:04x}", *v as u16)).collect();
        println!("  {:#08x}: {}", dump.offset + i as u64 * 16, lanes.join(" "));
    }
}

/// Prints the device window layout and every register slot.
fn cmd_map(config: &Config) {
    let map = AddressMap::new(&config.memory);
    let spad0 = map.spad_base(SpadId::Spad0);
    let spad1 = map.spad_base(SpadId::Spad1);
    println!("Address map (24-bit device window, top 8 bits masked)");
    println!("  config   {:#08x} .. {spad0:#08x}", 0);
    println!("  spad0    {spad0:#08x} .. {spad1:#08x}");
    println!("  spad1    {spad1:#08x} .. {:#08x}", map.mem_addr_max());
    println!("  external {:#010x} bytes (virtual access)", config.memory.external_bytes);
    println!();
    println!("Registers");
    for reg in RegId::ALL {
        println!("  {:#06x}  {reg:?}", reg.address());
    }
}
