//! Instruction decoder for the Hack CPU.
//!
//! Every instruction is one 16-bit word. Bit 15 selects the format:
//!
//! ```text
//! address instruction:  0vvv vvvv vvvv vvvv   A := v (15-bit literal)
//! compute instruction:  111a cccc ccdd djjj
//!                          |  |      |  +-- jump condition (bits 0-2)
//!                          |  |      +----- destinations (bits 3-5)
//!                          |  +------------ ALU selector (bits 6-11)
//!                          +--------------- y operand: A or M (bit 12)
//! ```
//!
//! Bits 13 and 14 of a compute instruction are ignored by the hardware.

use serde::{Serialize, Deserialize};

/// Bit 15: set for compute instructions.
pub const COMPUTE_FLAG: u16 = 0x8000;
/// Literal carried by an address instruction.
pub const LITERAL_MASK: u16 = 0x7FFF;

/// Bit 12: take the y operand from memory instead of `A`.
pub const A_BIT: u16 = 1 << 12;

pub const COMP_SHIFT: u32 = 6;
pub const COMP_MASK: u16 = 0b11_1111 << COMP_SHIFT;

pub const DEST_SHIFT: u32 = 3;
pub const DEST_MASK: u16 = 0b111 << DEST_SHIFT;

pub const JUMP_SHIFT: u32 = 0;
pub const JUMP_MASK: u16 = 0b111 << JUMP_SHIFT;

/// Is this an address (`@value`) instruction?
#[inline]
pub fn is_address(word: u16) -> bool {
    word & COMPUTE_FLAG == 0
}

/// The 15-bit literal of an address instruction.
#[inline]
pub fn literal(word: u16) -> u16 {
    word & LITERAL_MASK
}

/// The 6-bit ALU selector.
#[inline]
pub fn comp_bits(word: u16) -> u16 {
    (word & COMP_MASK) >> COMP_SHIFT
}

/// The 3 destination bits.
#[inline]
pub fn dest_bits(word: u16) -> u16 {
    (word & DEST_MASK) >> DEST_SHIFT
}

/// The 3 jump bits.
#[inline]
pub fn jump_bits(word: u16) -> u16 {
    (word & JUMP_MASK) >> JUMP_SHIFT
}

/// Does the y operand come from memory?
#[inline]
pub fn uses_memory(word: u16) -> bool {
    word & A_BIT != 0
}

/// Destination set of a compute instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dest(u16);

impl Dest {
    /// Write the result to memory at `A`.
    pub const M: u16 = 0b001;
    /// Load the result into `D`.
    pub const D: u16 = 0b010;
    /// Load the result into `A`.
    pub const A: u16 = 0b100;

    pub const NONE: Dest = Dest(0);

    pub fn from_bits(bits: u16) -> Self {
        Dest(bits & 0b111)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn writes_memory(self) -> bool {
        self.0 & Self::M != 0
    }

    pub fn loads_d(self) -> bool {
        self.0 & Self::D != 0
    }

    pub fn loads_a(self) -> bool {
        self.0 & Self::A != 0
    }

    const MNEMONICS: [&'static str; 8] = ["", "M", "D", "MD", "A", "AM", "AD", "AMD"];

    /// Assembly spelling, e.g. `AM`. Empty when no destination is set.
    pub fn mnemonic(self) -> &'static str {
        Self::MNEMONICS[self.0 as usize]
    }

    /// Parse an assembly destination such as `MD` or `AMD`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut bits = 0;
        for c in text.chars() {
            let bit = match c {
                'A' => Self::A,
                'D' => Self::D,
                'M' => Self::M,
                _ => return None,
            };
            if bits & bit != 0 {
                return None;
            }
            bits |= bit;
        }
        Some(Dest(bits))
    }
}

/// Jump condition of a compute instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Jump(u16);

impl Jump {
    /// Jump when the result is negative.
    pub const LT: u16 = 0b100;
    /// Jump when the result is zero.
    pub const EQ: u16 = 0b010;
    /// Jump when the result is positive.
    pub const GT: u16 = 0b001;

    pub const NEVER: Jump = Jump(0);

    const MNEMONICS: [&'static str; 8] = ["", "JGT", "JEQ", "JGE", "JLT", "JNE", "JLE", "JMP"];

    pub fn from_bits(bits: u16) -> Self {
        Jump(bits & 0b111)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    /// Evaluate the condition against the ALU flags.
    ///
    /// Exactly three cases jump: negative with `LT`, zero with `EQ`, and
    /// neither zero nor negative with `GT`.
    pub fn taken(self, zr: bool, ng: bool) -> bool {
        (self.0 & Self::LT != 0 && ng)
            || (self.0 & Self::EQ != 0 && zr)
            || (self.0 & Self::GT != 0 && !zr && !ng)
    }

    pub fn mnemonic(self) -> &'static str {
        Self::MNEMONICS[self.0 as usize]
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::MNEMONICS.iter()
            .position(|m| !m.is_empty() && *m == text)
            .map(|i| Jump(i as u16))
    }
}

/// A decoded Hack instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// `@value`: load a 15-bit literal into `A`.
    Address { value: u16 },
    /// `dest=comp;jump`.
    Compute {
        /// y operand is `M` rather than `A`.
        memory: bool,
        /// 6-bit ALU selector.
        comp: u16,
        dest: Dest,
        jump: Jump,
    },
}

impl Instruction {
    /// Decode a word. Every 16-bit value is a valid instruction.
    pub fn decode(word: u16) -> Self {
        if is_address(word) {
            Instruction::Address { value: literal(word) }
        } else {
            Instruction::Compute {
                memory: uses_memory(word),
                comp: comp_bits(word),
                dest: Dest::from_bits(dest_bits(word)),
                jump: Jump::from_bits(jump_bits(word)),
            }
        }
    }

    /// Encode back to a word. Compute instructions get bits 13 and 14 set,
    /// as the standard assembler emits them.
    pub fn encode(&self) -> u16 {
        match *self {
            Instruction::Address { value } => value & LITERAL_MASK,
            Instruction::Compute { memory, comp, dest, jump } => {
                let mut word = 0b111 << 13;
                if memory {
                    word |= A_BIT;
                }
                word |= (comp << COMP_SHIFT) & COMP_MASK;
                word |= (dest.bits() << DEST_SHIFT) & DEST_MASK;
                word |= (jump.bits() << JUMP_SHIFT) & JUMP_MASK;
                word
            }
        }
    }
}
