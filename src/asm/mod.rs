//! Program tooling for the Hack computer.
//!
//! This module provides:
//! - The `.hack` program image format (text, one 16-bit binary word per line)
//! - A simple two-pass assembler (Hack assembly → instruction words)
//! - A disassembler (instruction words → readable text)

pub mod assembler;
pub mod disasm;
pub mod hackfile;

pub use assembler::{assemble, AssemblerError};
pub use disasm::{disassemble, disassemble_instruction};
pub use hackfile::{HackFileError, parse_hack, format_hack, load_hack, save_hack};
