//! The Hack computer: CPU, ROM and RAM on one clock.
//!
//! Each cycle the machine fetches `ROM[PC]` and `RAM[A]`, ticks the CPU,
//! commits the write the CPU asked for (if any), and tocks to learn the
//! `PC` and `A` the next cycle fetches with.

use crate::cpu::{Cpu, TickOutput};
use crate::machine::memory::{Memory, MemoryError, MEMORY_BYTES};
use log::{debug, info, trace, warn};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// What to do with a RAM snapshot larger than RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotPolicy {
    /// Load the part that fits and drop the rest.
    #[default]
    Truncate,
    /// Refuse the snapshot and leave RAM untouched.
    Reject,
}

/// Register and counter summary of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    pub pc: u16,
    pub a: u16,
    pub d: u16,
    pub cycles: u64,
}

/// A Hack computer.
#[derive(Clone, Serialize, Deserialize)]
pub struct Machine {
    /// Instruction memory.
    rom: Memory,
    /// Data memory, including the memory-mapped screen and keyboard.
    ram: Memory,
    /// The CPU.
    pub cpu: Cpu,
    /// Cycles executed since the last reset.
    cycles: u64,
    /// `PC` as of the last tock.
    pc: u16,
    /// `A` as of the last tock.
    a: u16,
}

impl Machine {
    /// Create a machine with empty memories and zeroed registers.
    pub fn new() -> Self {
        Self {
            rom: Memory::new(),
            ram: Memory::new(),
            cpu: Cpu::new(),
            cycles: 0,
            pc: 0,
            a: 0,
        }
    }

    /// Create a machine with a program loaded into ROM.
    pub fn with_program(program: &[u16]) -> Result<Self, MachineError> {
        let mut machine = Self::new();
        machine.load_rom(program)?;
        Ok(machine)
    }

    /// Replace the contents of ROM with `program`, starting at address 0.
    pub fn load_rom(&mut self, program: &[u16]) -> Result<(), MachineError> {
        let mut rom = Memory::new();
        rom.load_words(program).map_err(|e| match e {
            MemoryError::TooLarge { size, available } => {
                MachineError::ProgramTooLarge { size, available }
            }
        })?;
        self.rom = rom;
        info!("loaded {} instructions into ROM", program.len());
        Ok(())
    }

    /// Copy a RAM snapshot over the start of RAM.
    ///
    /// Returns the number of bytes loaded.
    pub fn load_ram(&mut self, snapshot: &[u8], policy: SnapshotPolicy) -> Result<usize, MachineError> {
        if snapshot.len() > MEMORY_BYTES {
            match policy {
                SnapshotPolicy::Reject => {
                    return Err(MachineError::SnapshotTooLarge {
                        size: snapshot.len(),
                        available: MEMORY_BYTES,
                    });
                }
                SnapshotPolicy::Truncate => {
                    warn!(
                        "RAM snapshot is {} bytes, truncating to {}",
                        snapshot.len(),
                        MEMORY_BYTES
                    );
                }
            }
        }
        let n = self.ram.load_bytes(snapshot);
        info!("loaded {} bytes into RAM", n);
        Ok(n)
    }

    /// RAM contents in snapshot format.
    pub fn ram_bytes(&self) -> &[u8] {
        self.ram.as_bytes()
    }

    /// ROM contents, two big-endian bytes per instruction.
    pub fn rom_bytes(&self) -> &[u8] {
        self.rom.as_bytes()
    }

    pub fn rom(&self) -> &Memory {
        &self.rom
    }

    pub fn ram(&self) -> &Memory {
        &self.ram
    }

    /// Synchronous reset: zero the cycle counter and force `PC` to 0.
    pub fn reset(&mut self) {
        self.cycles = 0;
        self.cpu.tick(0, 0, true);
        (self.pc, self.a) = self.cpu.tock();
        debug!("reset: PC {:04x} A {:04x}", self.pc, self.a);
    }

    /// Execute one clock cycle.
    ///
    /// Returns the CPU's output for the cycle so callers can observe
    /// memory-mapped writes.
    pub fn step(&mut self) -> TickOutput {
        let instruction = self.rom.read(self.pc);
        let in_m = self.ram.read(self.a);

        let out = self.cpu.tick(instruction, in_m, false);
        trace!(
            "cycle {} PC {:04x} instruction {:04x} A {:04x} inM {:04x}",
            self.cycles, self.pc, instruction, self.a, in_m
        );

        if out.write {
            self.ram.write(out.address, out.alu_out);
            trace!("writeM addressM {:04x} outM {:04x}", out.address, out.alu_out);
        }

        (self.pc, self.a) = self.cpu.tock();
        trace!("tock A {:04x} D {:04x} nextPC {:04x}", self.a, self.cpu.regs.d, self.pc);

        self.cycles += 1;
        out
    }

    /// Reset, then run exactly `max_cycles` cycles.
    ///
    /// The architecture has no halt instruction, so there is no early exit.
    pub fn run(&mut self, max_cycles: u64) {
        self.reset();
        while self.cycles < max_cycles {
            self.step();
        }
    }

    /// Read a data word, e.g. from a memory-mapped device region.
    pub fn mmio_get(&self, addr: u16) -> u16 {
        self.ram.read(addr)
    }

    /// Write a data word, e.g. to inject device state.
    pub fn mmio_set(&mut self, addr: u16, value: u16) {
        self.ram.write(addr, value);
    }

    /// Cycles executed since the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Address of the instruction the next cycle fetches.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Address of the data word the next cycle fetches.
    pub fn a(&self) -> u16 {
        self.a
    }

    pub fn d(&self) -> u16 {
        self.cpu.regs.d
    }

    pub fn state(&self) -> MachineState {
        MachineState {
            pc: self.pc,
            a: self.a,
            d: self.cpu.regs.d,
            cycles: self.cycles,
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("cycles", &self.cycles)
            .field("cpu", &self.cpu)
            .field("ram", &self.ram)
            .finish()
    }
}

/// Errors from loading a machine's memories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("program of {size} instructions exceeds ROM size of {available}")]
    ProgramTooLarge { size: usize, available: usize },

    #[error("RAM snapshot of {size} bytes exceeds RAM size of {available} bytes")]
    SnapshotTooLarge { size: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::memory::MEMORY_WORDS;

    const AT_5: u16 = 0x0005;
    const AT_3: u16 = 0x0003;
    const D_EQ_A: u16 = 0b1110_1100_0001_0000;
    const D_EQ_D_PLUS_A: u16 = 0b1110_0000_1001_0000;
    const AM_EQ_M_PLUS_1: u16 = 0b1111_1101_1110_1000;
    const ZERO_JMP: u16 = 0b1110_1010_1000_0111;

    #[test]
    fn test_single_address_instruction() {
        let mut machine = Machine::with_program(&[AT_5]).unwrap();
        machine.cpu.regs.d = 1234;
        machine.run(1);

        assert_eq!(machine.a(), 5);
        assert_eq!(machine.pc(), 1);
        assert_eq!(machine.d(), 1234);
    }

    #[test]
    fn test_add_program() {
        let mut machine = Machine::with_program(&[AT_5, D_EQ_A, AT_3, D_EQ_D_PLUS_A]).unwrap();

        machine.run(3);
        assert_eq!(machine.d(), 5);

        machine.run(4);
        assert_eq!(machine.d(), 8);
        assert_eq!(machine.pc(), 4);
    }

    #[test]
    fn test_write_uses_address_before_update() {
        let mut machine = Machine::with_program(&[0x0064, AM_EQ_M_PLUS_1]).unwrap();
        machine.mmio_set(100, 41);
        machine.run(2);

        assert_eq!(machine.mmio_get(100), 42);
        assert_eq!(machine.mmio_get(42), 0);
        assert_eq!(machine.a(), 42);
    }

    #[test]
    fn test_step_reports_write() {
        let mut machine = Machine::with_program(&[0x0010, 0b1110_1110_1000_1000]).unwrap(); // @16, M=-1
        machine.reset();
        let first = machine.step();
        assert!(!first.write);

        let second = machine.step();
        assert!(second.write);
        assert_eq!(second.address, 16);
        assert_eq!(second.alu_out, 0xFFFF);
        assert_eq!(machine.mmio_get(16), 0xFFFF);
    }

    #[test]
    fn test_run_counts_cycles() {
        let mut machine = Machine::with_program(&[AT_5, ZERO_JMP]).unwrap();
        for n in [0, 1, 2, 17, 1000] {
            machine.run(n);
            assert_eq!(machine.cycles(), n);
        }
    }

    #[test]
    fn test_reset_forces_pc_zero() {
        let mut machine = Machine::with_program(&[AT_5, D_EQ_A, AT_3]).unwrap();
        machine.reset();
        machine.step();
        machine.step();
        assert_eq!(machine.pc(), 2);
        assert_eq!(machine.cycles(), 2);

        machine.reset();
        assert_eq!(machine.pc(), 0);
        assert_eq!(machine.cycles(), 0);
    }

    #[test]
    fn test_fetch_wraps_rom_address() {
        // PC past the end of ROM reads modulo its size
        let mut machine = Machine::with_program(&[AT_5]).unwrap();
        machine.reset();
        machine.cpu.regs.pc = 0x8000;
        machine.pc = 0x8000;
        machine.step();
        assert_eq!(machine.a(), 5);
    }

    #[test]
    fn test_ram_snapshot_roundtrip() {
        let mut machine = Machine::with_program(&[0x0010, 0b1110_1110_1000_1000]).unwrap();
        machine.mmio_set(0x4000, 0xAAAA);
        machine.run(2);
        let dump = machine.ram_bytes().to_vec();

        let mut fresh = Machine::new();
        fresh.reset();
        fresh.load_ram(&dump, SnapshotPolicy::Reject).unwrap();
        assert_eq!(fresh.ram_bytes(), &dump[..]);
        assert_eq!(fresh.mmio_get(16), 0xFFFF);
    }

    #[test]
    fn test_oversized_snapshot() {
        let mut machine = Machine::new();
        let snapshot = vec![1u8; MEMORY_BYTES + 2];

        let err = machine.load_ram(&snapshot, SnapshotPolicy::Reject).unwrap_err();
        assert_eq!(err, MachineError::SnapshotTooLarge { size: MEMORY_BYTES + 2, available: MEMORY_BYTES });
        assert_eq!(machine.mmio_get(0), 0);

        let n = machine.load_ram(&snapshot, SnapshotPolicy::Truncate).unwrap();
        assert_eq!(n, MEMORY_BYTES);
        assert_eq!(machine.mmio_get(0), 0x0101);
    }

    #[test]
    fn test_program_too_large() {
        let program = vec![0u16; MEMORY_WORDS + 1];
        assert!(matches!(
            Machine::with_program(&program),
            Err(MachineError::ProgramTooLarge { .. })
        ));
    }

    #[test]
    fn test_reload_rom_clears_old_program() {
        let mut machine = Machine::with_program(&[AT_5, AT_3]).unwrap();
        machine.load_rom(&[AT_3]).unwrap();
        assert_eq!(machine.rom().read(0), AT_3);
        assert_eq!(machine.rom().read(1), 0);
    }
}
