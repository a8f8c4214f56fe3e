//! WebAssembly bindings for the Hack emulator.
//!
//! This module provides JavaScript-friendly wrappers around the core emulator.

use wasm_bindgen::prelude::*;
use crate::{Machine, Screen};
use crate::asm::{assemble, parse_hack, disassemble_instruction};
use crate::io::{KBD, SCREEN_BASE, SCREEN_WORDS};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// WebAssembly-friendly machine wrapper.
#[wasm_bindgen]
pub struct WasmMachine {
    machine: Machine,
}

#[wasm_bindgen]
impl WasmMachine {
    /// Create a machine with empty memories.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { machine: Machine::new() }
    }

    /// Load a `.hack` program image. Returns the instruction count.
    #[wasm_bindgen]
    pub fn load_hack(&mut self, text: &str) -> Result<usize, JsError> {
        let program = parse_hack(text).map_err(js_error)?;
        self.load(&program)
    }

    /// Load a program from assembly source code. Returns the instruction count.
    #[wasm_bindgen]
    pub fn load_asm(&mut self, source: &str) -> Result<usize, JsError> {
        let program = assemble(source).map_err(js_error)?;
        self.load(&program)
    }

    fn load(&mut self, program: &[u16]) -> Result<usize, JsError> {
        self.machine.load_rom(program).map_err(js_error)?;
        self.machine.reset();
        Ok(program.len())
    }

    /// Load a RAM snapshot, truncating anything beyond RAM. Returns bytes loaded.
    #[wasm_bindgen]
    pub fn load_ram(&mut self, snapshot: &[u8]) -> Result<usize, JsError> {
        self.machine
            .load_ram(snapshot, Default::default())
            .map_err(js_error)
    }

    /// Synchronous reset.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    /// Execute one cycle. Returns the disassembled instruction.
    #[wasm_bindgen]
    pub fn step(&mut self) -> String {
        let instr = self.machine.rom().read(self.machine.pc());
        self.machine.step();
        disassemble_instruction(instr)
    }

    /// Continue for `cycles` cycles without resetting. Returns the cycle count.
    #[wasm_bindgen]
    pub fn run(&mut self, cycles: u32) -> u64 {
        for _ in 0..cycles {
            self.machine.step();
        }
        self.machine.cycles()
    }

    #[wasm_bindgen]
    pub fn cycles(&self) -> u64 {
        self.machine.cycles()
    }

    #[wasm_bindgen]
    pub fn pc(&self) -> u16 {
        self.machine.pc()
    }

    #[wasm_bindgen]
    pub fn a(&self) -> u16 {
        self.machine.a()
    }

    #[wasm_bindgen]
    pub fn d(&self) -> u16 {
        self.machine.d()
    }

    /// Get a RAM word.
    #[wasm_bindgen]
    pub fn memory_at(&self, addr: u16) -> u16 {
        self.machine.mmio_get(addr)
    }

    /// The whole screen region, one word per 16 pixels.
    #[wasm_bindgen]
    pub fn screen_words(&self) -> Vec<u16> {
        (0..SCREEN_WORDS as u16)
            .map(|i| self.machine.mmio_get(SCREEN_BASE + i))
            .collect()
    }

    /// Screen as one byte per pixel (1 = black), row-major.
    #[wasm_bindgen]
    pub fn screen_pixels(&self) -> Vec<u8> {
        let mut screen = Screen::new();
        screen.sync(&self.machine);
        screen.pixels().iter().map(|&p| p as u8).collect()
    }

    /// Key-down with a raw Hack key code.
    #[wasm_bindgen]
    pub fn press_key(&mut self, code: u16) {
        self.machine.mmio_set(KBD, code);
    }

    /// Key-up.
    #[wasm_bindgen]
    pub fn release_key(&mut self) {
        self.machine.release_key();
    }

    /// RAM contents in snapshot format.
    #[wasm_bindgen]
    pub fn ram_bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.machine.ram_bytes())
    }

    /// Get registers and cycle count as a JSON string.
    #[wasm_bindgen]
    pub fn state_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.machine.state()).map_err(js_error)
    }
}

impl Default for WasmMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble source code to `.hack` text.
#[wasm_bindgen]
pub fn wasm_assemble(source: &str) -> Result<String, JsError> {
    let program = assemble(source).map_err(js_error)?;
    Ok(crate::asm::format_hack(&program))
}

/// Disassemble a single instruction word.
#[wasm_bindgen]
pub fn wasm_disassemble(word: u16) -> String {
    disassemble_instruction(word)
}
