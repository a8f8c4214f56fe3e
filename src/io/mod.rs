//! Memory-mapped devices of the Hack platform.
//!
//! The screen and keyboard live in data memory:
//! - `SCREEN_BASE..SCREEN_BASE + SCREEN_WORDS`: 512x256 monochrome bitmap
//! - `KBD`: code of the key currently held, 0 when none

pub mod screen;
pub mod keyboard;

pub use screen::Screen;
pub use keyboard::{Key, key_code};

/// First word of the screen bitmap.
pub const SCREEN_BASE: u16 = 16384;
/// Screen width in pixels.
pub const SCREEN_WIDTH: usize = 512;
/// Screen height in pixels.
pub const SCREEN_HEIGHT: usize = 256;
/// Pixels packed in one word.
pub const PIXELS_PER_WORD: usize = 16;
/// Words per screen row.
pub const WORDS_PER_ROW: usize = SCREEN_WIDTH / PIXELS_PER_WORD;
/// Size of the screen bitmap in words.
pub const SCREEN_WORDS: u16 = (WORDS_PER_ROW * SCREEN_HEIGHT) as u16;
/// Keyboard register.
pub const KBD: u16 = 24576;
