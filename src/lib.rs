//! # Hack Emulator
//!
//! A clock-cycle emulator of the Hack computer, the 16-bit machine built
//! in the Nand2Tetris course.
//!
//! The Hack CPU executes one instruction per cycle. A cycle is modelled as
//! a rising edge ([`Cpu::tick`]), which latches the new register values and
//! reports the memory write the instruction asked for, followed by a
//! falling edge ([`Cpu::tock`]), which exposes the next `PC` and `A`.
//! [`Machine`] drives the clock over 32K words of ROM and 32K words of RAM,
//! with the screen and keyboard mapped into RAM.

pub mod cpu;
pub mod machine;
pub mod io;
pub mod asm;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use cpu::{alu, AluOutput, Cpu, Registers, Instruction, TickOutput};
pub use machine::{Machine, MachineError, MachineState, Memory, SnapshotPolicy};
pub use io::{Key, Screen, key_code};
pub use asm::{assemble, disassemble, AssemblerError, HackFileError, load_hack, save_hack};

#[cfg(feature = "tui")]
pub use tui::run_debugger;
