//! The Hack computer around the CPU.
//!
//! - 32K words of instruction memory (ROM)
//! - 32K words of data memory (RAM), holding the memory-mapped devices
//! - the clock loop: reset, single step, bounded run

pub mod memory;
pub mod computer;
pub mod snapshot;

pub use memory::{Memory, MemoryError, MEMORY_WORDS};
pub use computer::{Machine, MachineError, MachineState, SnapshotPolicy};
pub use snapshot::{load_ram_file, dump_ram_file, dump_rom_file, SnapshotError};
