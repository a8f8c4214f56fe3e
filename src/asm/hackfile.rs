//! `.hack` program image format.
//!
//! A `.hack` file is plain text:
//! - One instruction per line
//! - Exactly 16 `0`/`1` characters, most significant bit first
//! - A trailing `\r` is tolerated; nothing else is

use crate::machine::MEMORY_WORDS;
use std::path::Path;
use std::io::Write;
use thiserror::Error;

/// Width of one instruction line.
pub const LINE_WIDTH: usize = 16;

/// Parse a program image from text.
pub fn parse_hack(text: &str) -> Result<Vec<u16>, HackFileError> {
    let mut program = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        program.push(parse_line(line, line_num + 1)?);
    }

    if program.len() > MEMORY_WORDS {
        return Err(HackFileError::TooLarge {
            size: program.len(),
            available: MEMORY_WORDS,
        });
    }

    Ok(program)
}

fn parse_line(line: &str, line_num: usize) -> Result<u16, HackFileError> {
    if line.len() != LINE_WIDTH {
        return Err(HackFileError::ParseError {
            line: line_num,
            message: format!("expected {} bits, found {} characters", LINE_WIDTH, line.chars().count()),
        });
    }

    line.chars().try_fold(0u16, |word, c| match c {
        '0' => Ok(word << 1),
        '1' => Ok(word << 1 | 1),
        _ => Err(HackFileError::ParseError {
            line: line_num,
            message: format!("invalid character {:?} in {:?}", c, line),
        }),
    })
}

/// Format a program as `.hack` text.
pub fn format_hack(program: &[u16]) -> String {
    let mut out = String::with_capacity(program.len() * (LINE_WIDTH + 1));
    for word in program {
        out.push_str(&format!("{:016b}\n", word));
    }
    out
}

/// Load a `.hack` file from disk.
pub fn load_hack<P: AsRef<Path>>(path: P) -> Result<Vec<u16>, HackFileError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    parse_hack(&text)
}

/// Save a program to a `.hack` file.
pub fn save_hack<P: AsRef<Path>>(path: P, program: &[u16]) -> Result<(), HackFileError> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path).map_err(|e| io_error(path, e))?;
    file.write_all(format_hack(program).as_bytes())
        .map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, e: std::io::Error) -> HackFileError {
    HackFileError::IoError(format!("{}: {}", path.display(), e))
}

/// Errors that can occur loading a program image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HackFileError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("program of {size} instructions exceeds ROM size of {available}")]
    TooLarge { size: usize, available: usize },
}
