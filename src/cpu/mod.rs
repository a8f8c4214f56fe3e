//! CPU emulation for the Hack computer.
//!
//! This module implements the Hack CPU at clock-cycle granularity:
//! - a stateless ALU with a 6-bit operation selector
//! - 3 registers: A (address), D (data), PC (program counter)
//! - a 2-format instruction set: address (`@value`) and compute (`dest=comp;jump`)

pub mod alu;
pub mod registers;
pub mod decode;
pub mod execute;

pub use alu::{alu, AluOutput};
pub use registers::Registers;
pub use decode::{Instruction, Dest, Jump};
pub use execute::{Cpu, TickOutput};
