//! Hack Emulator - CLI Entry Point
//!
//! Commands:
//! - `hack-emu run <program>` - Run a `.hack` or `.asm` file for N cycles
//! - `hack-emu debug <program>` - Interactive debugger with screen and keyboard
//! - `hack-emu asm <source>` - Assemble to `.hack`
//! - `hack-emu disasm <program>` - Disassemble a `.hack` file

use clap::{Parser, Subcommand};
use hack::{Machine, SnapshotPolicy};
use hack::machine::{load_ram_file, dump_ram_file, dump_rom_file};
use log::*;

#[derive(Parser)]
#[command(name = "hack-emu")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "A clock-cycle emulator of the 16-bit Hack computer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset, run a program for a fixed number of cycles, then dump RAM
    Run {
        /// Path to the `.hack` or `.asm` file to execute
        program: String,
        /// Number of cycles to run after reset
        #[arg(short = 'c', long, default_value = "10000")]
        max_cycles: u64,
        /// RAM snapshot to load before running
        #[arg(short, long)]
        ram: Option<String>,
        /// Where to write the RAM snapshot after the run
        #[arg(short = 'o', long, default_value = "ram.dump")]
        dump: String,
        /// Also write the ROM image to this path
        #[arg(long)]
        rom_dump: Option<String>,
        /// Log every cycle (same as RUST_LOG=trace)
        #[arg(short, long)]
        trace: bool,
        /// Print the final registers as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive debugger
    #[cfg(feature = "tui")]
    Debug {
        /// Path to the `.hack` or `.asm` file to debug
        program: String,
        /// RAM snapshot to load before starting
        #[arg(short, long)]
        ram: Option<String>,
        /// Clock speed in MHz (0 = as fast as possible)
        #[arg(short, long, default_value = "2.0")]
        speed: f64,
    },
    /// Assemble source to `.hack`
    Asm {
        /// Path to the source file
        source: String,
        /// Output `.hack` file
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Disassemble a `.hack` file to readable text
    Disasm {
        /// Path to the `.hack` file
        program: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let trace = matches!(cli.command, Commands::Run { trace: true, .. });
    let default_filter = if trace { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Commands::Run { program, max_cycles, ram, dump, rom_dump, trace: _, json } => {
            run_program(&program, max_cycles, ram.as_deref(), &dump, rom_dump.as_deref(), json);
        }
        #[cfg(feature = "tui")]
        Commands::Debug { program, ram, speed } => {
            debug_program(&program, ram.as_deref(), speed);
        }
        Commands::Asm { source, output } => {
            assemble_file(&source, output);
        }
        Commands::Disasm { program } => {
            disassemble_file(&program);
        }
    }
}

/// Load a program image, assembling it first if it is a `.asm` source.
fn load_program(path: &str) -> Vec<u16> {
    if path.ends_with(".asm") {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Failed to read file: {}", e);
                std::process::exit(1);
            }
        };

        match hack::assemble(&source) {
            Ok(program) => {
                info!("assembled {} instructions from {}", program.len(), path);
                program
            }
            Err(e) => {
                eprintln!("❌ Assembly error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match hack::load_hack(path) {
            Ok(program) => program,
            Err(e) => {
                eprintln!("❌ Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        }
    }
}

/// Build a machine with `program` in ROM and an optional RAM snapshot.
fn build_machine(program_path: &str, ram: Option<&str>) -> Machine {
    let program = load_program(program_path);

    let mut machine = match Machine::with_program(&program) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ Failed to load program: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = ram {
        if let Err(e) = load_ram_file(&mut machine, path, SnapshotPolicy::Truncate) {
            eprintln!("❌ Failed to load RAM snapshot: {}", e);
            std::process::exit(1);
        }
    }

    machine
}

fn run_program(
    path: &str,
    max_cycles: u64,
    ram: Option<&str>,
    dump: &str,
    rom_dump: Option<&str>,
    json: bool,
) {
    let mut machine = build_machine(path, ram);

    info!("running {} for {} cycles", path, max_cycles);
    machine.run(max_cycles);

    if let Err(e) = dump_ram_file(&machine, dump) {
        eprintln!("❌ Failed to write RAM dump: {}", e);
        std::process::exit(1);
    }
    info!("wrote RAM to {}", dump);

    if let Some(rom_path) = rom_dump {
        if let Err(e) = dump_rom_file(&machine, rom_path) {
            eprintln!("❌ Failed to write ROM dump: {}", e);
            std::process::exit(1);
        }
        info!("wrote ROM to {}", rom_path);
    }

    let state = machine.state();
    if json {
        match serde_json::to_string_pretty(&state) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to encode state: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("━━━ Result ━━━");
        println!("Cycles: {}", state.cycles);
        println!("PC: {:05} (0x{:04x})", state.pc, state.pc);
        println!("A:  {:>6} (0x{:04x})", state.a as i16, state.a);
        println!("D:  {:>6} (0x{:04x})", state.d as i16, state.d);
    }
}

#[cfg(feature = "tui")]
fn debug_program(path: &str, ram: Option<&str>, speed: f64) {
    let machine = build_machine(path, ram);

    if let Err(e) = hack::run_debugger(machine, speed) {
        eprintln!("❌ Debugger error: {}", e);
        std::process::exit(1);
    }
}

fn assemble_file(source_path: &str, output: Option<String>) {
    let out_path = output.unwrap_or_else(|| {
        match source_path.strip_suffix(".asm") {
            Some(stem) => format!("{}.hack", stem),
            None => format!("{}.hack", source_path),
        }
    });

    let source = match std::fs::read_to_string(source_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Failed to read file: {}", e);
            std::process::exit(1);
        }
    };

    let program = match hack::assemble(&source) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("❌ Assembly error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = hack::save_hack(&out_path, &program) {
        eprintln!("❌ Failed to save {}: {}", out_path, e);
        std::process::exit(1);
    }

    println!("✓ Assembled {} instructions → {}", program.len(), out_path);
}

fn disassemble_file(path: &str) {
    let program = match hack::load_hack(path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("❌ Failed to load {}: {}", path, e);
            std::process::exit(1);
        }
    };

    println!("{}", hack::disassemble(&program));
}
