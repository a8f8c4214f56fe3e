//! Hack memory subsystem.
//!
//! Both instruction memory (ROM) and data memory (RAM) hold 32768 16-bit
//! words. Each word is stored as two bytes, most significant first, so a
//! dump of the backing bytes is the RAM snapshot format verbatim.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The number of words in each memory.
pub const MEMORY_WORDS: usize = 32 * 1024;

/// Size of the backing store in bytes.
pub const MEMORY_BYTES: usize = MEMORY_WORDS * 2;

/// Mask applied to every address: the 15-bit address space.
pub const ADDRESS_MASK: u16 = (MEMORY_WORDS - 1) as u16;

/// A word-addressed memory backed by big-endian byte pairs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    /// Create a new memory with all words zeroed.
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MEMORY_BYTES],
        }
    }

    #[inline]
    fn offset(addr: u16) -> usize {
        (addr & ADDRESS_MASK) as usize * 2
    }

    /// Read a word. The address is taken modulo the memory size.
    #[inline]
    pub fn read(&self, addr: u16) -> u16 {
        let i = Self::offset(addr);
        u16::from_be_bytes([self.bytes[i], self.bytes[i + 1]])
    }

    /// Write a word. The address is taken modulo the memory size.
    #[inline]
    pub fn write(&mut self, addr: u16, value: u16) {
        let i = Self::offset(addr);
        self.bytes[i..i + 2].copy_from_slice(&value.to_be_bytes());
    }

    /// Load words starting at address 0.
    pub fn load_words(&mut self, words: &[u16]) -> Result<(), MemoryError> {
        if words.len() > MEMORY_WORDS {
            return Err(MemoryError::TooLarge {
                size: words.len(),
                available: MEMORY_WORDS,
            });
        }

        for (addr, &word) in words.iter().enumerate() {
            self.write(addr as u16, word);
        }

        Ok(())
    }

    /// Copy raw bytes over the start of memory.
    ///
    /// Bytes past the end are not copied; the number of bytes copied is
    /// returned. A trailing odd byte lands in the high half of its word.
    pub fn load_bytes(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(MEMORY_BYTES);
        self.bytes[..n].copy_from_slice(&data[..n]);
        n
    }

    /// The backing bytes, big-endian word order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Read `count` consecutive words starting at `start` (for debugging).
    pub fn dump(&self, start: u16, count: usize) -> Vec<(u16, u16)> {
        let start = start & ADDRESS_MASK;
        let end = (start as usize + count).min(MEMORY_WORDS);
        (start as usize..end)
            .map(|i| (i as u16, self.read(i as u16)))
            .collect()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only count non-zero words
        let non_zero = (0..MEMORY_WORDS as u16)
            .filter(|&addr| self.read(addr) != 0)
            .count();

        f.debug_struct("Memory")
            .field("non_zero_words", &non_zero)
            .field("total_words", &MEMORY_WORDS)
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Data does not fit in memory.
    #[error("{size} words exceed available space of {available} words")]
    TooLarge { size: usize, available: usize },
}
