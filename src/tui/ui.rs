//! UI rendering for the debugger.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, List, ListItem},
    style::{Color, Style, Modifier},
};
use crate::io::{Screen, SCREEN_WIDTH, SCREEN_HEIGHT};
use super::app::DebuggerApp;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &DebuggerApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),
            Constraint::Length(44),
        ])
        .split(frame.area());

    // Left side: screen and status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    draw_screen(frame, left_chunks[0], app);
    draw_status(frame, left_chunks[1], app);

    // Right side: registers, code, memory and help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(6),
            Constraint::Min(6),
            Constraint::Length(5),
        ])
        .split(chunks[1]);

    draw_registers(frame, right_chunks[0], app);
    draw_disassembly(frame, right_chunks[1], app);
    draw_memory(frame, right_chunks[2], app);
    draw_help(frame, right_chunks[3]);
}

/// Braille dot bit for pixel `(dx, dy)` within a 2x4 cell.
const BRAILLE_DOTS: [[u32; 2]; 4] = [
    [0x01, 0x08],
    [0x02, 0x10],
    [0x04, 0x20],
    [0x40, 0x80],
];

/// Render the whole screen, one string per terminal row.
pub(super) fn braille_lines(screen: &Screen) -> Vec<String> {
    (0..SCREEN_HEIGHT / 4)
        .map(|row| braille_row(screen, row, SCREEN_WIDTH / 2))
        .collect()
}

/// Render one terminal row of the screen, 4 pixel rows high, as braille.
fn braille_row(screen: &Screen, cell_row: usize, cells: usize) -> String {
    (0..cells)
        .map(|cell| {
            let mut bits = 0;
            for (dy, row) in BRAILLE_DOTS.iter().enumerate() {
                for (dx, bit) in row.iter().enumerate() {
                    if screen.pixel(cell * 2 + dx, cell_row * 4 + dy) {
                        bits |= bit;
                    }
                }
            }
            char::from_u32(0x2800 + bits).unwrap_or(' ')
        })
        .collect()
}

/// Draw the memory-mapped screen, clipped to the available area.
fn draw_screen(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let cells = area.width.saturating_sub(2) as usize;
    let rows = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = app.screen_lines
        .iter()
        .take(rows)
        .map(|line| Line::from(line.chars().take(cells).collect::<String>()))
        .collect();

    let title = if app.input_mode { " Screen [keyboard] " } else { " Screen " };
    let screen = Paragraph::new(lines)
        .style(Style::default().fg(Color::Black).bg(Color::White))
        .block(Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if app.input_mode { Color::Yellow } else { Color::Cyan })));

    frame.render_widget(screen, area);
}

/// Draw disassembly around PC.
fn draw_disassembly(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let disasm = app.get_disassembly((area.height as usize).saturating_sub(2));

    let items: Vec<ListItem> = disasm
        .iter()
        .map(|(addr, instr, is_current)| {
            let prefix = if *is_current { "▶ " } else { "  " };
            let bp = if app.breakpoints.contains(addr) { "●" } else { " " };
            let text = format!("{}{:05}: {}", prefix, addr, instr);

            let style = if *is_current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if app.breakpoints.contains(addr) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };

            ListItem::new(format!("{} {}", bp, text)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" ROM ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(list, area);
}

/// Draw register state.
fn draw_registers(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let m = &app.machine;
    let in_m = m.mmio_get(m.a());

    let content = vec![
        Line::from(vec![
            Span::raw("A:  "),
            Span::styled(format!("{:04x}", m.a()), Style::default().fg(Color::White)),
            Span::raw(format!(" = {:>6}", m.a() as i16)),
        ]),
        Line::from(vec![
            Span::raw("D:  "),
            Span::styled(format!("{:04x}", m.d()), Style::default().fg(Color::White)),
            Span::raw(format!(" = {:>6}", m.d() as i16)),
        ]),
        Line::from(vec![
            Span::raw("M:  "),
            Span::styled(format!("{:04x}", in_m), Style::default().fg(Color::White)),
            Span::raw(format!(" = {:>6}", in_m as i16)),
        ]),
        Line::from(vec![
            Span::raw("PC: "),
            Span::styled(format!("{:04x}", m.pc()), Style::default().fg(Color::Yellow)),
            Span::raw("   KBD: "),
            Span::styled(format!("{}", app.keyboard()), Style::default().fg(Color::Magenta)),
        ]),
        Line::from(vec![
            Span::raw("Cycles: "),
            Span::styled(format!("{}", m.cycles()), Style::default().fg(Color::Cyan)),
            Span::raw("   "),
            Span::styled(
                if app.running { "Running" } else { "Paused" },
                if app.running {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                }),
        ]),
    ];

    let paragraph = Paragraph::new(content)
        .block(Block::default()
            .title(" Registers ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)));

    frame.render_widget(paragraph, area);
}

/// Draw memory view.
fn draw_memory(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let visible_rows = (area.height as usize).saturating_sub(2);
    let start = app.mem_scroll as usize;
    let end = (start + visible_rows).min(crate::machine::MEMORY_WORDS);

    let items: Vec<ListItem> = app.machine.ram()
        .dump(start as u16, end - start)
        .into_iter()
        .map(|(addr, value)| {
            let is_a = addr == app.machine.a();
            let text = format!("{:05}: {:04x} = {}", addr, value, value as i16);

            let style = if is_a {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if value != 0 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" RAM ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(list, area);
}

/// Draw status bar.
fn draw_status(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let status = Paragraph::new(app.status.clone())
        .style(Style::default().fg(Color::White))
        .block(Block::default()
            .title(" Status ")
            .borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("s: Step  r: Run  p: Pause  b: Break"),
        Line::from("x: Reset  ↑↓ PgUp PgDn: RAM  q: Quit"),
        Line::from("Tab: keyboard input  Ctrl-C: Quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default()
        .title(" Help ")
        .borders(Borders::ALL));

    frame.render_widget(help, area);
}
