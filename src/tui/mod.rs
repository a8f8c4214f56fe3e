//! TUI debugger for the Hack emulator.
//!
//! Provides an interactive terminal-based debugger with:
//! - The 512x256 screen drawn in braille cells
//! - Keyboard input forwarded to the `KBD` register
//! - Register and RAM views
//! - Step/run/breakpoint controls over a ROM disassembly

mod app;
mod ui;

pub use app::{DebuggerApp, run_debugger, map_key};
