//! Simple assembler for Hack programs.
//!
//! Syntax:
//! ```text
//! // Comment
//! (LOOP)          // Define a label
//!     @i          // A := address of variable i (allocated from 16)
//!     M=M+1       // dest=comp
//!     @LOOP
//!     0;JMP       // comp;jump
//! ```
//!
//! Predefined symbols: `SP LCL ARG THIS THAT R0`-`R15 SCREEN KBD`.

use crate::cpu::alu::comp;
use crate::cpu::decode::{Instruction, Dest, Jump, LITERAL_MASK};
use crate::io::{SCREEN_BASE, KBD};
use std::collections::HashMap;
use thiserror::Error;

/// First RAM address handed out to variables.
pub const VARIABLE_BASE: u16 = 16;

/// Assemble source code to a list of instruction words.
pub fn assemble(source: &str) -> Result<Vec<u16>, AssemblerError> {
    let mut asm = Assembler::new();
    asm.assemble(source)
}

/// The assembler state.
struct Assembler {
    /// Symbol table (label or variable -> address).
    symbols: HashMap<String, u16>,
    /// Pending references: (output_index, symbol, source_line).
    pending: Vec<(usize, String, usize)>,
    /// Output instructions.
    output: Vec<u16>,
}

impl Assembler {
    fn new() -> Self {
        let mut symbols = HashMap::new();
        for (i, name) in ["SP", "LCL", "ARG", "THIS", "THAT"].iter().enumerate() {
            symbols.insert(name.to_string(), i as u16);
        }
        for r in 0..16u16 {
            symbols.insert(format!("R{}", r), r);
        }
        symbols.insert("SCREEN".to_string(), SCREEN_BASE);
        symbols.insert("KBD".to_string(), KBD);

        Self {
            symbols,
            pending: Vec::new(),
            output: Vec::new(),
        }
    }

    fn assemble(&mut self, source: &str) -> Result<Vec<u16>, AssemblerError> {
        // Pass 1: collect labels and generate code
        for (line_num, line) in source.lines().enumerate() {
            self.process_line(line, line_num + 1)?;
        }

        // Pass 2: resolve labels, allocate variables
        self.resolve_references()?;

        Ok(std::mem::take(&mut self.output))
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> Result<(), AssemblerError> {
        // Remove comments
        let line = match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        };
        let line = line.trim();

        if line.is_empty() {
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix('(') {
            let label = rest.strip_suffix(')')
                .map(str::trim)
                .filter(|l| is_symbol(l))
                .ok_or_else(|| AssemblerError::SyntaxError {
                    line: line_num,
                    message: format!("malformed label {:?}", line),
                })?;
            if self.output.len() > LITERAL_MASK as usize {
                return Err(AssemblerError::ValueOutOfRange {
                    line: line_num,
                    value: self.output.len() as u32,
                });
            }
            if self.symbols.contains_key(label) {
                return Err(AssemblerError::SyntaxError {
                    line: line_num,
                    message: format!("symbol {} already defined", label),
                });
            }
            self.symbols.insert(label.to_string(), self.output.len() as u16);
            return Ok(());
        }

        if let Some(operand) = line.strip_prefix('@') {
            let word = self.parse_address(operand.trim(), line_num)?;
            self.output.push(word);
            return Ok(());
        }

        let instr = parse_compute(line, line_num)?;
        self.output.push(instr.encode());
        Ok(())
    }

    fn parse_address(&mut self, operand: &str, line_num: usize) -> Result<u16, AssemblerError> {
        if operand.starts_with(|c: char| c.is_ascii_digit()) {
            let value: u32 = operand.parse().map_err(|_| AssemblerError::SyntaxError {
                line: line_num,
                message: format!("invalid number {:?}", operand),
            })?;
            if value > LITERAL_MASK as u32 {
                return Err(AssemblerError::ValueOutOfRange { line: line_num, value });
            }
            return Ok(value as u16);
        }

        if !is_symbol(operand) {
            return Err(AssemblerError::SyntaxError {
                line: line_num,
                message: format!("invalid symbol {:?}", operand),
            });
        }

        // Resolved in pass 2
        self.pending.push((self.output.len(), operand.to_string(), line_num));
        Ok(0)
    }

    fn resolve_references(&mut self) -> Result<(), AssemblerError> {
        let mut next_variable = VARIABLE_BASE;
        for (out_idx, symbol, line_num) in &self.pending {
            let addr = match self.symbols.get(symbol) {
                Some(&addr) => addr,
                None => {
                    if next_variable > LITERAL_MASK {
                        return Err(AssemblerError::ValueOutOfRange {
                            line: *line_num,
                            value: next_variable as u32,
                        });
                    }
                    let addr = next_variable;
                    self.symbols.insert(symbol.clone(), addr);
                    next_variable += 1;
                    addr
                }
            };
            self.output[*out_idx] = addr & LITERAL_MASK;
        }
        Ok(())
    }
}

fn is_symbol(text: &str) -> bool {
    !text.is_empty()
        && !text.starts_with(|c: char| c.is_ascii_digit())
        && text.chars().all(|c| c.is_ascii_alphanumeric() || "_.$:".contains(c))
}

/// Parse `dest=comp;jump`, where `dest=` and `;jump` are optional.
fn parse_compute(line: &str, line_num: usize) -> Result<Instruction, AssemblerError> {
    let text: String = line.chars().filter(|c| !c.is_whitespace()).collect();

    let (dest_text, rest) = match text.split_once('=') {
        Some((d, r)) => (Some(d), r),
        None => (None, text.as_str()),
    };
    let (comp_text, jump_text) = match rest.split_once(';') {
        Some((c, j)) => (c, Some(j)),
        None => (rest, None),
    };

    let dest = match dest_text {
        Some(d) => Dest::parse(d).filter(|d| d.bits() != 0).ok_or_else(|| AssemblerError::SyntaxError {
            line: line_num,
            message: format!("invalid destination {:?}", d),
        })?,
        None => Dest::NONE,
    };

    let jump = match jump_text {
        Some(j) => Jump::parse(j).ok_or_else(|| AssemblerError::SyntaxError {
            line: line_num,
            message: format!("invalid jump {:?}", j),
        })?,
        None => Jump::NEVER,
    };

    let (selector, memory) = parse_comp(comp_text).ok_or_else(|| AssemblerError::UnknownMnemonic {
        line: line_num,
        mnemonic: comp_text.to_string(),
    })?;

    Ok(Instruction::Compute { memory, comp: selector, dest, jump })
}

/// Look up a computation, returning its selector and whether it reads `M`.
fn parse_comp(text: &str) -> Option<(u16, bool)> {
    let memory = text.contains('M');
    if memory && text.contains('A') {
        return None;
    }
    let normalized = text.replace('M', "A");

    if let Some(selector) = lookup(&normalized) {
        return Some((selector, memory));
    }

    // Commutative operators may be written either way round
    for op in ['+', '&', '|'] {
        if let Some((lhs, rhs)) = normalized.split_once(op) {
            if let Some(selector) = lookup(&format!("{}{}{}", rhs, op, lhs)) {
                return Some((selector, memory));
            }
        }
    }

    None
}

fn lookup(mnemonic: &str) -> Option<u16> {
    comp::TABLE.iter()
        .find(|(_, name)| *name == mnemonic)
        .map(|(selector, _)| *selector)
}

/// Errors that can occur during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error("syntax error on line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("unknown computation on line {line}: {mnemonic}")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("value out of range on line {line}: {value}")]
    ValueOutOfRange { line: usize, value: u32 },
}
