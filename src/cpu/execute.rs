//! Hack CPU execution engine.
//!
//! One clock cycle is split in two phases, mirroring clocked hardware:
//!
//! - [`Cpu::tick`] is the rising edge. The instruction is decoded, the ALU
//!   runs, and the next values of `A`, `D` and `PC` are latched. The memory
//!   write intent for the cycle is returned, addressed by the value `A` held
//!   *before* the edge.
//! - [`Cpu::tock`] is the falling edge. It exposes the latched `PC` and `A`
//!   so the caller can fetch the next instruction and memory operand.

use crate::cpu::alu::alu;
use crate::cpu::decode::{self, Dest, Jump};
use crate::cpu::Registers;
use serde::{Serialize, Deserialize};

/// What one tick asks of the memory system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickOutput {
    /// The ALU result of this cycle (`outM`).
    pub alu_out: u16,
    /// Whether `alu_out` must be stored (`writeM`).
    pub write: bool,
    /// Value of `A` before this cycle's update (`addressM`). Both the write
    /// address and, when a jump is taken, the jump target.
    pub address: u16,
}

/// The Hack CPU.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpu {
    /// CPU registers.
    pub regs: Registers,
}

impl Cpu {
    /// Create a new CPU with zeroed registers.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
        }
    }

    /// Rising clock edge.
    ///
    /// `instruction` is the word at `ROM[PC]`, `in_m` the word at `RAM[A]`.
    /// With `reset` asserted, `PC` becomes 0 whatever the instruction says.
    pub fn tick(&mut self, instruction: u16, in_m: u16, reset: bool) -> TickOutput {
        let compute = !decode::is_address(instruction);
        let dest = Dest::from_bits(decode::dest_bits(instruction));
        let jump = Jump::from_bits(decode::jump_bits(instruction));

        let y = if decode::uses_memory(instruction) { in_m } else { self.regs.a };
        let result = alu(self.regs.d, y, decode::comp_bits(instruction));

        let load_d = compute && dest.loads_d();
        let write = compute && dest.writes_memory();
        let load_pc = compute && jump.taken(result.zr, result.ng);

        let prior_a = self.regs.a;
        if !compute {
            self.regs.a = decode::literal(instruction);
        } else if dest.loads_a() {
            self.regs.a = result.out;
        }

        if load_d {
            self.regs.d = result.out;
        }

        if reset {
            self.regs.jump(0);
        } else if load_pc {
            self.regs.jump(prior_a);
        } else {
            self.regs.advance_pc();
        }

        TickOutput {
            alu_out: result.out,
            write,
            address: prior_a,
        }
    }

    /// Falling clock edge: the `(PC, A)` pair latched by the last tick.
    pub fn tock(&self) -> (u16, u16) {
        (self.regs.pc, self.regs.a)
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("a", &format_args!("{:#06x}", self.regs.a))
            .field("d", &format_args!("{:#06x}", self.regs.d))
            .field("pc", &format_args!("{:#06x}", self.regs.pc))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Hand-encoded words, checked against the standard assembler.
    const AT_5: u16 = 0b0000_0000_0000_0101;
    const D_EQ_A: u16 = 0b1110_1100_0001_0000;
    const D_EQ_D_PLUS_A: u16 = 0b1110_0000_1001_0000;
    const M_EQ_D: u16 = 0b1110_0011_0000_1000;
    const AM_EQ_M_PLUS_1: u16 = 0b1111_1101_1110_1000;
    const ZERO_JMP: u16 = 0b1110_1010_1000_0111;
    const D_JGT: u16 = 0b1110_0011_0000_0001;
    const D_JEQ: u16 = 0b1110_0011_0000_0010;
    const D_JLT: u16 = 0b1110_0011_0000_0100;

    #[test]
    fn test_address_instruction() {
        let mut cpu = Cpu::new();
        cpu.regs.d = 77;
        let out = cpu.tick(AT_5, 0, false);

        assert!(!out.write);
        assert_eq!(out.address, 0);
        assert_eq!(cpu.tock(), (1, 5));
        assert_eq!(cpu.regs.d, 77);
    }

    #[test]
    fn test_address_literal_ignores_top_bit() {
        let mut cpu = Cpu::new();
        cpu.tick(0x7FFF, 0, false);
        assert_eq!(cpu.regs.a, 0x7FFF);
    }

    #[test]
    fn test_load_d_from_a() {
        let mut cpu = Cpu::new();
        cpu.tick(AT_5, 0, false);
        let out = cpu.tick(D_EQ_A, 0, false);

        assert_eq!(out.alu_out, 5);
        assert!(!out.write);
        assert_eq!(cpu.regs.d, 5);
        assert_eq!(cpu.regs.pc, 2);
    }

    #[test]
    fn test_add() {
        let mut cpu = Cpu::new();
        cpu.regs.d = 5;
        cpu.regs.a = 3;
        cpu.tick(D_EQ_D_PLUS_A, 0, false);
        assert_eq!(cpu.regs.d, 8);
    }

    #[test]
    fn test_write_targets_prior_a() {
        let mut cpu = Cpu::new();
        cpu.regs.a = 100;
        // AM=M+1 with M = 41: A becomes 42 but the write goes to 100
        let out = cpu.tick(AM_EQ_M_PLUS_1, 41, false);

        assert!(out.write);
        assert_eq!(out.alu_out, 42);
        assert_eq!(out.address, 100);
        assert_eq!(cpu.tock(), (1, 42));
    }

    #[test]
    fn test_memory_write_flag() {
        let mut cpu = Cpu::new();
        cpu.regs.d = 9;
        cpu.regs.a = 16;
        let out = cpu.tick(M_EQ_D, 0, false);
        assert!(out.write);
        assert_eq!(out.alu_out, 9);
        assert_eq!(out.address, 16);
    }

    #[test]
    fn test_unconditional_jump_to_prior_a() {
        let mut cpu = Cpu::new();
        cpu.regs.a = 1234;
        cpu.regs.pc = 7;
        cpu.tick(ZERO_JMP, 0, false);
        assert_eq!(cpu.regs.pc, 1234);
    }

    #[test]
    fn test_conditional_jumps() {
        let cases = [
            (D_JGT, 1u16, true),
            (D_JGT, 0, false),
            (D_JGT, 0x8000, false),
            (D_JEQ, 0, true),
            (D_JEQ, 1, false),
            (D_JLT, 0xFFFF, true),
            (D_JLT, 0, false),
            (D_JLT, 1, false),
        ];
        for (instr, d, taken) in cases {
            let mut cpu = Cpu::new();
            cpu.regs.d = d;
            cpu.regs.a = 50;
            cpu.regs.pc = 3;
            cpu.tick(instr, 0, false);
            let expected = if taken { 50 } else { 4 };
            assert_eq!(cpu.regs.pc, expected, "instr {:016b} d {:#x}", instr, d);
        }
    }

    #[test]
    fn test_reset_overrides_jump() {
        let mut cpu = Cpu::new();
        cpu.regs.a = 99;
        cpu.regs.pc = 12;
        cpu.tick(ZERO_JMP, 0, true);
        assert_eq!(cpu.regs.pc, 0);
    }

    #[test]
    fn test_reset_with_null_instruction() {
        let mut cpu = Cpu::new();
        cpu.regs = Registers { a: 10, d: 20, pc: 30 };
        let out = cpu.tick(0, 0, true);
        assert!(!out.write);
        assert_eq!(cpu.tock(), (0, 0));
        assert_eq!(cpu.regs.d, 20);
    }

    #[test]
    fn test_pc_wraps() {
        let mut cpu = Cpu::new();
        cpu.regs.pc = 0xFFFF;
        cpu.tick(AT_5, 0, false);
        assert_eq!(cpu.regs.pc, 0);
    }

    #[test]
    fn test_address_instruction_never_jumps() {
        // Low bits 111 look like JMP but this is an address instruction.
        let mut cpu = Cpu::new();
        cpu.regs.pc = 4;
        cpu.tick(0b0000_0000_0000_0111, 0, false);
        assert_eq!(cpu.tock(), (5, 7));
    }
}
