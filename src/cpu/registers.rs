//! Hack CPU registers.
//!
//! The Hack CPU has three registers, all 16 bits wide:
//! - A: address register (also a general data register)
//! - D: data register
//! - PC: program counter

use serde::{Serialize, Deserialize};

/// The Hack register file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// A: selects the memory word `M` and the jump target.
    pub a: u16,

    /// D: data register, always the ALU's x operand.
    pub d: u16,

    /// PC: address of the next instruction in ROM.
    pub pc: u16,
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the program counter, wrapping at 65536.
    pub fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1);
    }

    /// Set the program counter to an absolute address.
    pub fn jump(&mut self, addr: u16) {
        self.pc = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_pc() {
        let mut regs = Registers::new();
        regs.pc = 10;

        regs.advance_pc();
        assert_eq!(regs.pc, 11);
    }

    #[test]
    fn test_advance_pc_wraps() {
        let mut regs = Registers::new();
        regs.pc = 0xFFFF;
        regs.advance_pc();
        assert_eq!(regs.pc, 0);
    }
}
