//! The Hack arithmetic logic unit.
//!
//! A purely combinational function: two 16-bit operands and a 6-bit
//! selector in, a 16-bit result and two status flags out. The selector
//! bits, from most to least significant, are:
//!
//! | bit | name | effect                                  |
//! |-----|------|-----------------------------------------|
//! | 5   | `zx` | zero the x operand                      |
//! | 4   | `nx` | complement the x operand                |
//! | 3   | `zy` | zero the y operand                      |
//! | 2   | `ny` | complement the y operand                |
//! | 1   | `f`  | combine with `+` (set) or `&` (clear)   |
//! | 0   | `no` | complement the result                   |
//!
//! Operand zeroing happens before complementing, and both happen before
//! the operands are combined. Result complementing happens last.

use serde::{Serialize, Deserialize};

/// Zero the x operand.
pub const ZX: u16 = 0b10_0000;
/// Complement the x operand.
pub const NX: u16 = 0b01_0000;
/// Zero the y operand.
pub const ZY: u16 = 0b00_1000;
/// Complement the y operand.
pub const NY: u16 = 0b00_0100;
/// Add when set, AND when clear.
pub const F: u16 = 0b00_0010;
/// Complement the result.
pub const NO: u16 = 0b00_0001;

/// Result of one ALU evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AluOutput {
    /// The 16-bit result.
    pub out: u16,
    /// Set when `out == 0`.
    pub zr: bool,
    /// Set when bit 15 of `out` is set.
    pub ng: bool,
}

impl AluOutput {
    fn from_result(out: u16) -> Self {
        Self {
            out,
            zr: out == 0,
            ng: out & 0x8000 != 0,
        }
    }

    /// Neither zero nor negative.
    #[inline]
    pub fn is_positive(&self) -> bool {
        !self.zr && !self.ng
    }
}

/// Evaluate the ALU.
///
/// Bits of `selector` above bit 5 are ignored.
pub fn alu(x: u16, y: u16, selector: u16) -> AluOutput {
    let mut x = x;
    let mut y = y;

    if selector & ZX != 0 {
        x = 0;
    }
    if selector & NX != 0 {
        x = !x;
    }
    if selector & ZY != 0 {
        y = 0;
    }
    if selector & NY != 0 {
        y = !y;
    }

    let mut out = if selector & F != 0 {
        x.wrapping_add(y)
    } else {
        x & y
    };

    if selector & NO != 0 {
        out = !out;
    }

    AluOutput::from_result(out)
}

/// The eighteen computations the Hack assembly language names.
///
/// Each one is a selector value; combined with the `a` bit of an
/// instruction, `A` in the mnemonic reads `M` instead.
pub mod comp {
    pub const ZERO: u16 = 0b101010;
    pub const ONE: u16 = 0b111111;
    pub const MINUS_ONE: u16 = 0b111010;
    pub const D: u16 = 0b001100;
    pub const A: u16 = 0b110000;
    pub const NOT_D: u16 = 0b001101;
    pub const NOT_A: u16 = 0b110001;
    pub const NEG_D: u16 = 0b001111;
    pub const NEG_A: u16 = 0b110011;
    pub const D_PLUS_ONE: u16 = 0b011111;
    pub const A_PLUS_ONE: u16 = 0b110111;
    pub const D_MINUS_ONE: u16 = 0b001110;
    pub const A_MINUS_ONE: u16 = 0b110010;
    pub const D_PLUS_A: u16 = 0b000010;
    pub const D_MINUS_A: u16 = 0b010011;
    pub const A_MINUS_D: u16 = 0b000111;
    pub const D_AND_A: u16 = 0b000000;
    pub const D_OR_A: u16 = 0b010101;

    /// Selector and mnemonic for every named computation, with `A` as the
    /// y operand.
    pub const TABLE: [(u16, &str); 18] = [
        (ZERO, "0"),
        (ONE, "1"),
        (MINUS_ONE, "-1"),
        (D, "D"),
        (A, "A"),
        (NOT_D, "!D"),
        (NOT_A, "!A"),
        (NEG_D, "-D"),
        (NEG_A, "-A"),
        (D_PLUS_ONE, "D+1"),
        (A_PLUS_ONE, "A+1"),
        (D_MINUS_ONE, "D-1"),
        (A_MINUS_ONE, "A-1"),
        (D_PLUS_A, "D+A"),
        (D_MINUS_A, "D-A"),
        (A_MINUS_D, "A-D"),
        (D_AND_A, "D&A"),
        (D_OR_A, "D|A"),
    ];

    /// Look up the mnemonic of a selector, if it has one.
    pub fn mnemonic(selector: u16) -> Option<&'static str> {
        TABLE.iter()
            .find(|(sel, _)| *sel == selector)
            .map(|(_, name)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [u16; 8] = [0, 1, 5, 0x7FFF, 0x8000, 0xFFFF, 0x1234, 0xBEEF];

    #[test]
    fn test_zero_selector_always_zero() {
        for x in SAMPLES {
            for y in SAMPLES {
                let r = alu(x, y, comp::ZERO);
                assert_eq!(r.out, 0);
                assert!(r.zr);
                assert!(!r.ng);
            }
        }
    }

    #[test]
    fn test_all_bits_selector_is_one() {
        // !((!0) + (!0)) = !0xFFFE = 1
        for x in SAMPLES {
            for y in SAMPLES {
                assert_eq!(alu(x, y, 0b111111).out, 1);
            }
        }
    }

    #[test]
    fn test_minus_one_selector() {
        for x in SAMPLES {
            let r = alu(x, 0x1234, comp::MINUS_ONE);
            assert_eq!(r.out, 0xFFFF);
            assert!(r.ng);
            assert!(!r.zr);
        }
    }

    #[test]
    fn test_named_computations() {
        let d: u16 = 17;
        let a: u16 = 5;
        let cases = [
            (comp::D, 17),
            (comp::A, 5),
            (comp::NOT_D, !17),
            (comp::NOT_A, !5),
            (comp::NEG_D, 17u16.wrapping_neg()),
            (comp::NEG_A, 5u16.wrapping_neg()),
            (comp::D_PLUS_ONE, 18),
            (comp::A_PLUS_ONE, 6),
            (comp::D_MINUS_ONE, 16),
            (comp::A_MINUS_ONE, 4),
            (comp::D_PLUS_A, 22),
            (comp::D_MINUS_A, 12),
            (comp::A_MINUS_D, 5u16.wrapping_sub(17)),
            (comp::D_AND_A, 17 & 5),
            (comp::D_OR_A, 17 | 5),
        ];
        for (selector, expected) in cases {
            assert_eq!(alu(d, a, selector).out, expected, "selector {:06b}", selector);
        }
    }

    #[test]
    fn test_add_wraps() {
        let r = alu(0xFFFF, 1, comp::D_PLUS_A);
        assert_eq!(r.out, 0);
        assert!(r.zr);
    }

    #[test]
    fn test_flags() {
        let r = alu(0x8000, 0, comp::D);
        assert!(r.ng);
        assert!(!r.zr);
        assert!(!r.is_positive());

        let r = alu(3, 0, comp::D);
        assert!(r.is_positive());
    }

    #[test]
    fn test_high_selector_bits_ignored() {
        assert_eq!(alu(9, 4, comp::D_PLUS_A | 0xFFC0), alu(9, 4, comp::D_PLUS_A));
    }

    #[test]
    fn test_mnemonic_lookup() {
        assert_eq!(comp::mnemonic(comp::D_PLUS_A), Some("D+A"));
        assert_eq!(comp::mnemonic(0b100000), None);
    }
}
