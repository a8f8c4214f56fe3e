//! The memory-mapped display.
//!
//! Each screen word holds 16 pixels; bit 0 is the leftmost and a set bit is
//! black. [`Screen`] keeps an unpacked pixel buffer in step with RAM by
//! watching the writes [`Machine::step`](crate::Machine::step) reports, so a
//! front-end only redraws when something changed.

use crate::cpu::TickOutput;
use crate::io::{SCREEN_BASE, SCREEN_WORDS, SCREEN_WIDTH, SCREEN_HEIGHT, PIXELS_PER_WORD, WORDS_PER_ROW};
use crate::machine::memory::ADDRESS_MASK;
use crate::Machine;

/// Unpacked copy of the screen region.
#[derive(Clone)]
pub struct Screen {
    /// Row-major, `true` = black.
    pixels: Vec<bool>,
    /// Set by any change since the last [`Screen::take_dirty`].
    dirty: bool,
}

impl Screen {
    /// A blank (all white) screen.
    pub fn new() -> Self {
        Self {
            pixels: vec![false; SCREEN_WIDTH * SCREEN_HEIGHT],
            dirty: true,
        }
    }

    /// Is `addr` inside the screen region?
    pub fn contains(addr: u16) -> bool {
        (SCREEN_BASE..SCREEN_BASE + SCREEN_WORDS).contains(&addr)
    }

    /// Apply one cycle's output. Returns `true` if it wrote to the screen.
    ///
    /// The address is masked the way RAM masks it, so writes through an
    /// `A` of `0x8000` and above still reach the screen.
    pub fn observe(&mut self, out: &TickOutput) -> bool {
        let addr = out.address & ADDRESS_MASK;
        if out.write && Self::contains(addr) {
            self.put_word(addr - SCREEN_BASE, out.alu_out);
            true
        } else {
            false
        }
    }

    /// Rebuild the whole buffer from RAM, e.g. after loading a snapshot.
    pub fn sync(&mut self, machine: &Machine) {
        for offset in 0..SCREEN_WORDS {
            self.put_word(offset, machine.mmio_get(SCREEN_BASE + offset));
        }
        self.dirty = true;
    }

    fn put_word(&mut self, offset: u16, word: u16) {
        let offset = offset as usize;
        let row = offset / WORDS_PER_ROW;
        let col = (offset % WORDS_PER_ROW) * PIXELS_PER_WORD;
        let start = row * SCREEN_WIDTH + col;
        for bit in 0..PIXELS_PER_WORD {
            self.pixels[start + bit] = word & (1 << bit) != 0;
        }
        self.dirty = true;
    }

    /// Pixel at `(x, y)`; out-of-range coordinates read as white.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < SCREEN_WIDTH && y < SCREEN_HEIGHT && self.pixels[y * SCREEN_WIDTH + x]
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Whether anything changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}
