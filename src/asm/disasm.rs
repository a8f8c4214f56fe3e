//! Disassembler for Hack programs.
//!
//! Converts instruction words back to readable assembly.

use crate::cpu::alu::comp;
use crate::cpu::decode::Instruction;

/// Disassemble a single instruction to text.
///
/// Selectors without a standard mnemonic are shown as `comp(0bxxxxxx)`.
pub fn disassemble_instruction(word: u16) -> String {
    match Instruction::decode(word) {
        Instruction::Address { value } => format!("@{}", value),
        Instruction::Compute { memory, comp: selector, dest, jump } => {
            let mut text = String::new();
            if !dest.mnemonic().is_empty() {
                text.push_str(dest.mnemonic());
                text.push('=');
            }
            text.push_str(&format_comp(selector, memory));
            if !jump.mnemonic().is_empty() {
                text.push(';');
                text.push_str(jump.mnemonic());
            }
            text
        }
    }
}

/// Disassemble a slice of instructions.
pub fn disassemble(program: &[u16]) -> String {
    let mut output = String::new();
    output.push_str("// Hack Disassembly\n");
    output.push_str("// ----------------\n\n");

    for (addr, word) in program.iter().enumerate() {
        let line = disassemble_instruction(*word);
        output.push_str(&format!("{:05}: {:<16} // {:016b}\n", addr, line, word));
    }

    output
}

/// Format a computation, reading `M` for the y operand when `memory` is set.
fn format_comp(selector: u16, memory: bool) -> String {
    match comp::mnemonic(selector) {
        Some(name) if memory => name.replace('A', "M"),
        Some(name) => name.to_string(),
        None if memory => format!("comp(0b{:06b},M)", selector),
        None => format!("comp(0b{:06b})", selector),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disassemble_address() {
        assert_eq!(disassemble_instruction(5), "@5");
        assert_eq!(disassemble_instruction(0x7FFF), "@32767");
    }

    #[test]
    fn test_disassemble_compute() {
        assert_eq!(disassemble_instruction(0b1110_0000_1001_0000), "D=D+A");
        assert_eq!(disassemble_instruction(0b1111_1101_1110_1000), "AM=M+1");
        assert_eq!(disassemble_instruction(0b1110_1010_1000_0111), "0;JMP");
        assert_eq!(disassemble_instruction(0b1110_0011_0000_0001), "D;JGT");
    }

    #[test]
    fn test_disassemble_unnamed_selector() {
        assert_eq!(disassemble_instruction(0b1110_1000_0000_0000), "comp(0b100000)");
    }

    #[test]
    fn test_listing() {
        let listing = disassemble(&[5, 0b1110_1010_1000_0111]);
        assert!(listing.contains("00000: @5"));
        assert!(listing.contains("00001: 0;JMP"));
    }
}
