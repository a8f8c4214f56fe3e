//! Debugger application state and logic.

use crate::{Machine, Screen, Key};
use crate::asm::disasm::disassemble_instruction;
use crate::io::KBD;
use crossterm::event::KeyCode;
use std::collections::HashSet;

/// Frames per second the front-end aims for.
pub const FPS: u64 = 30;

/// Cycles per frame when no clock speed is set.
const UNTHROTTLED_CYCLES_PER_FRAME: u64 = 250_000;

/// Frames a key stays down without a repeat or release event.
const KEY_HOLD_FRAMES: u32 = 6;

/// Debugger application state.
pub struct DebuggerApp {
    /// The machine being debugged.
    pub machine: Machine,
    /// Pixels of the memory-mapped screen.
    pub screen: Screen,
    /// Braille rendering of `screen`, rebuilt only when it changes.
    pub screen_lines: Vec<String>,
    /// Breakpoints (by ROM address).
    pub breakpoints: HashSet<u16>,
    /// Is the debugger running continuously?
    pub running: bool,
    /// Are key presses forwarded to the machine's keyboard register?
    pub input_mode: bool,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// Memory view scroll offset.
    pub mem_scroll: u16,
    /// Cycles executed per frame while running.
    pub cycles_per_frame: u64,
    /// Frames left before the held key is released.
    key_hold: u32,
}

impl DebuggerApp {
    /// Create a debugger around a loaded machine.
    ///
    /// `speed_mhz` is the approximate clock rate; 0 runs as fast as possible.
    pub fn new(mut machine: Machine, speed_mhz: f64) -> Self {
        machine.reset();
        let mut screen = Screen::new();
        screen.sync(&machine);

        Self {
            machine,
            screen,
            screen_lines: Vec::new(),
            breakpoints: HashSet::new(),
            running: false,
            input_mode: false,
            should_quit: false,
            status: "Ready. Press 's' to step, 'r' to run, Tab for keyboard input, 'q' to quit.".into(),
            mem_scroll: 0,
            cycles_per_frame: cycles_per_frame(speed_mhz),
            key_hold: 0,
        }
    }

    /// Execute one cycle.
    pub fn step(&mut self) {
        let pc = self.machine.pc();
        let instr = self.machine.rom().read(pc);
        let out = self.machine.step();
        self.screen.observe(&out);

        let disasm = disassemble_instruction(instr);
        self.status = if out.write {
            format!("PC={:05}: {}  (RAM[{}] := {})", pc, disasm, out.address, out.alu_out as i16)
        } else {
            format!("PC={:05}: {}", pc, disasm)
        };
    }

    /// Run until paused or a breakpoint is reached.
    pub fn run(&mut self) {
        // Leave the current breakpoint before watching for the next one
        if self.breakpoints.contains(&self.machine.pc()) {
            self.step();
        }
        self.running = true;
        self.status = "Running...".into();
    }

    /// Run one frame's worth of cycles.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        for _ in 0..self.cycles_per_frame {
            let pc = self.machine.pc();
            if self.breakpoints.contains(&pc) {
                self.running = false;
                self.status = format!("Breakpoint at PC={}", pc);
                return;
            }

            let out = self.machine.step();
            self.screen.observe(&out);
        }
    }

    /// Rebuild the braille lines if the screen changed. Returns `true` if it did.
    pub fn refresh_screen(&mut self) -> bool {
        if !self.screen.take_dirty() {
            return false;
        }
        self.screen_lines = super::ui::braille_lines(&self.screen);
        true
    }

    /// Count down the held key, releasing it when the hold expires.
    pub fn frame_elapsed(&mut self) {
        if self.key_hold > 0 {
            self.key_hold -= 1;
            if self.key_hold == 0 {
                self.machine.release_key();
            }
        }
    }

    /// Forward a key press to the machine.
    pub fn press(&mut self, key: Key) {
        self.machine.press_key(key);
        self.key_hold = KEY_HOLD_FRAMES;
    }

    /// Forward a key release to the machine.
    pub fn release(&mut self) {
        self.machine.release_key();
        self.key_hold = 0;
    }

    /// Toggle whether key presses go to the machine or the debugger.
    pub fn toggle_input_mode(&mut self) {
        self.input_mode = !self.input_mode;
        self.release();
        self.status = if self.input_mode {
            "Keyboard input goes to the machine. Tab to leave.".into()
        } else {
            "Debugger commands active.".into()
        };
    }

    /// Toggle breakpoint at current PC.
    pub fn toggle_breakpoint(&mut self) {
        let pc = self.machine.pc();
        if self.breakpoints.remove(&pc) {
            self.status = format!("Removed breakpoint at PC={}", pc);
        } else {
            self.breakpoints.insert(pc);
            self.status = format!("Set breakpoint at PC={}", pc);
        }
    }

    /// Synchronous reset: PC back to 0, RAM kept.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.running = false;
        self.status = "Reset. Ready.".into();
    }

    /// Current value of the keyboard register.
    pub fn keyboard(&self) -> u16 {
        self.machine.mmio_get(KBD)
    }

    /// Get disassembly around current PC.
    pub fn get_disassembly(&self, lines: usize) -> Vec<(u16, String, bool)> {
        let pc = self.machine.pc();
        let start = pc.saturating_sub(lines as u16 / 2);

        (0..lines as u16)
            .map(|i| start.wrapping_add(i))
            .map(|addr| {
                let instr = self.machine.rom().read(addr);
                (addr, disassemble_instruction(instr), addr == pc)
            })
            .collect()
    }
}

fn cycles_per_frame(speed_mhz: f64) -> u64 {
    if speed_mhz > 0.0 {
        ((speed_mhz * 1_000_000.0) / FPS as f64).max(1.0) as u64
    } else {
        UNTHROTTLED_CYCLES_PER_FRAME
    }
}

/// Translate a terminal key to a machine key.
pub fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Left => Key::Left,
        KeyCode::Up => Key::Up,
        KeyCode::Right => Key::Right,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(key)
}

/// Run the debugger on a machine with a program loaded.
pub fn run_debugger(machine: Machine, speed_mhz: f64) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyEventKind, KeyModifiers},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::{Duration, Instant};

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = DebuggerApp::new(machine, speed_mhz);
    let frame_time = Duration::from_millis(1000 / FPS);

    // Main loop
    loop {
        let frame_start = Instant::now();

        // Draw
        app.refresh_screen();
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        // Handle input
        while event::poll(frame_time.saturating_sub(frame_start.elapsed()))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };

            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.should_quit = true;
                break;
            }

            if app.input_mode {
                match (key.kind, key.code) {
                    (KeyEventKind::Press, KeyCode::Tab) => app.toggle_input_mode(),
                    (KeyEventKind::Release, _) => app.release(),
                    (_, code) => {
                        if let Some(k) = map_key(code) {
                            app.press(k);
                        }
                    }
                }
                continue;
            }

            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('s') => {
                    app.running = false;
                    app.step();
                }
                KeyCode::Char('r') => app.run(),
                KeyCode::Char('p') => {
                    app.running = false;
                    app.status = "Paused.".into();
                }
                KeyCode::Char('b') => app.toggle_breakpoint(),
                KeyCode::Char('x') => app.reset(),
                KeyCode::Tab => app.toggle_input_mode(),
                KeyCode::Up => {
                    app.mem_scroll = app.mem_scroll.saturating_sub(1);
                }
                KeyCode::Down => {
                    app.mem_scroll = (app.mem_scroll + 1).min(crate::machine::MEMORY_WORDS as u16 - 1);
                }
                KeyCode::PageUp => {
                    app.mem_scroll = app.mem_scroll.saturating_sub(256);
                }
                KeyCode::PageDown => {
                    app.mem_scroll = app.mem_scroll.saturating_add(256).min(crate::machine::MEMORY_WORDS as u16 - 1);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }

        // Run this frame's cycles
        app.tick();
        app.frame_elapsed();
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    log::info!("stopped after {} cycles", app.machine.cycles());
    Ok(())
}
