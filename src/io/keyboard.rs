//! The memory-mapped keyboard.
//!
//! While a key is held, `KBD` holds its code; on release it goes back to 0.
//! Codes follow the Hack character set: printable ASCII as-is (letters
//! upper-cased) and named keys from 128 up.

use crate::io::KBD;
use crate::Machine;

/// A physical key, independent of any windowing or terminal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Left,
    Up,
    Right,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Escape,
    /// Function key `F1`..`F12`.
    F(u8),
}

pub const NEWLINE: u16 = 128;
pub const BACKSPACE: u16 = 129;
pub const LEFT_ARROW: u16 = 130;
pub const UP_ARROW: u16 = 131;
pub const RIGHT_ARROW: u16 = 132;
pub const DOWN_ARROW: u16 = 133;
pub const HOME: u16 = 134;
pub const END: u16 = 135;
pub const PAGE_UP: u16 = 136;
pub const PAGE_DOWN: u16 = 137;
pub const INSERT: u16 = 138;
pub const DELETE: u16 = 139;
pub const ESCAPE: u16 = 140;
/// `F1`; `F2`..`F12` follow consecutively.
pub const F1: u16 = 141;

/// Translate a key to the code a Hack program reads from `KBD`.
///
/// Keys without a code map to 0, the same as no key.
pub fn key_code(key: Key) -> u16 {
    match key {
        Key::Char(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase() as u16,
        Key::Char(c) if (' '..='~').contains(&c) => c as u16,
        Key::Char(_) => 0,
        Key::Enter => NEWLINE,
        Key::Backspace => BACKSPACE,
        Key::Left => LEFT_ARROW,
        Key::Up => UP_ARROW,
        Key::Right => RIGHT_ARROW,
        Key::Down => DOWN_ARROW,
        Key::Home => HOME,
        Key::End => END,
        Key::PageUp => PAGE_UP,
        Key::PageDown => PAGE_DOWN,
        Key::Insert => INSERT,
        Key::Delete => DELETE,
        Key::Escape => ESCAPE,
        Key::F(n @ 1..=12) => F1 + (n as u16 - 1),
        Key::F(_) => 0,
    }
}

impl Machine {
    /// Key-down: publish the key's code in `KBD`.
    pub fn press_key(&mut self, key: Key) {
        self.mmio_set(KBD, key_code(key));
    }

    /// Key-up: clear `KBD`.
    pub fn release_key(&mut self) {
        self.mmio_set(KBD, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_passthrough() {
        assert_eq!(key_code(Key::Char(' ')), 32);
        assert_eq!(key_code(Key::Char('0')), 48);
        assert_eq!(key_code(Key::Char('@')), 64);
        assert_eq!(key_code(Key::Char('[')), 91);
        assert_eq!(key_code(Key::Char('_')), 95);
        assert_eq!(key_code(Key::Char('~')), 126);
    }

    #[test]
    fn test_letters_upper_case() {
        assert_eq!(key_code(Key::Char('a')), 65);
        assert_eq!(key_code(Key::Char('Z')), 90);
        assert_eq!(key_code(Key::Char('q')), key_code(Key::Char('Q')));
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(key_code(Key::Enter), 128);
        assert_eq!(key_code(Key::Backspace), 129);
        assert_eq!(key_code(Key::Left), 130);
        assert_eq!(key_code(Key::Down), 133);
        assert_eq!(key_code(Key::Escape), 140);
        assert_eq!(key_code(Key::F(1)), 141);
        assert_eq!(key_code(Key::F(12)), 152);
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(key_code(Key::F(0)), 0);
        assert_eq!(key_code(Key::F(13)), 0);
        assert_eq!(key_code(Key::Char('é')), 0);
        assert_eq!(key_code(Key::Char('\t')), 0);
    }

    #[test]
    fn test_press_and_release() {
        let mut machine = Machine::new();
        machine.press_key(Key::Char('k'));
        assert_eq!(machine.mmio_get(KBD), 75);
        machine.release_key();
        assert_eq!(machine.mmio_get(KBD), 0);
    }
}
