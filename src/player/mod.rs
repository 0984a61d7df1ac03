//! Player: the runtime playback controller.
//!
//! Consumes a `PlayablePresentation` and drives it to the terminal, either
//! one frame per key press or timed at the presentation's frame rate.
//! The player does not interpret semantics or perform rendering decisions;
//! it treats the presentation as an immutable, authoritative visual script.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Result, bail};
use crossterm::{cursor, event, execute, queue, style, terminal};

use crate::types::{Cell, Color, Frame, NamedColor, PlayablePresentation, Style};

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;

pub struct Player {
    presentation: PlayablePresentation,
    current_frame: usize,
    grid: Vec<Vec<Cell>>,
    fullscreen: bool,
    playing: bool,
}

impl Player {
    pub fn new(presentation: PlayablePresentation) -> Self {
        let w = presentation.contract.width as usize;
        let h = presentation.contract.height as usize;
        Self {
            presentation,
            current_frame: 0,
            grid: vec![vec![Cell::default(); w]; h],
            fullscreen: false,
            playing: false,
        }
    }

    /// Time between frames while autoplaying.
    fn frame_interval(&self) -> Duration {
        let rate = self.presentation.frame_rate;
        if rate.is_finite() && rate > 0.0 {
            Duration::from_secs_f64(1.0 / rate)
        } else {
            Duration::from_millis(33)
        }
    }

    fn last_frame(&self) -> usize {
        self.presentation.frames.len().saturating_sub(1)
    }

    /// First marker after the current frame, wrapping to the first marker.
    fn next_marker(&self) -> Option<usize> {
        let markers = &self.presentation.markers;
        markers
            .iter()
            .map(|m| m.frame_index)
            .find(|&i| i > self.current_frame)
            .or_else(|| markers.first().map(|m| m.frame_index))
            .filter(|&i| i <= self.last_frame())
    }

    /// Play the presentation in the terminal.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let need_w = self.presentation.contract.width;
        let need_h = self.presentation.contract.height;
        // +2: one row for menu bar, one row for status bar
        if term_w < need_w || term_h < need_h + 2 {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                need_w,
                need_h + 2,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        if self.presentation.frames.is_empty() {
            return Ok(());
        }
        self.apply_frame(0)?;
        self.render_menubar(stdout)?;
        self.render_full(stdout)?;
        self.render_status(stdout)?;

        loop {
            if self.playing && !event::poll(self.frame_interval())? {
                if self.current_frame < self.last_frame() {
                    self.step_forward(stdout)?;
                } else {
                    self.playing = false;
                    self.render_status(stdout)?;
                }
                continue;
            }

            match event::read()? {
                event::Event::Key(key) => {
                    use event::KeyCode::*;
                    match key.code {
                        Char('q') | Esc => break,
                        Char('p') => {
                            self.playing = !self.playing;
                            if self.playing && self.current_frame == self.last_frame() {
                                self.jump_to(stdout, 0)?;
                            }
                            self.render_status(stdout)?;
                        }
                        Right | Char(' ') | Enter => {
                            if self.current_frame < self.last_frame() {
                                self.step_forward(stdout)?;
                            }
                        }
                        Left => {
                            if self.current_frame > 0 {
                                self.jump_to(stdout, self.current_frame - 1)?;
                            }
                        }
                        Home => self.jump_to(stdout, 0)?,
                        End => self.jump_to(stdout, self.last_frame())?,
                        Char('m') => {
                            if let Some(target) = self.next_marker() {
                                self.jump_to(stdout, target)?;
                            }
                        }
                        F(11) => {
                            self.fullscreen = !self.fullscreen;
                            if self.fullscreen {
                                stdout.write_all(b"\x1b[10;1t")?;
                            } else {
                                stdout.write_all(b"\x1b[10;0t")?;
                            }
                            stdout.flush()?;
                        }
                        _ => {}
                    }
                }
                event::Event::Resize(_, _) => {
                    self.render_menubar(stdout)?;
                    self.render_full(stdout)?;
                    self.render_status(stdout)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn step_forward(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.current_frame += 1;
        self.apply_frame(self.current_frame)?;
        self.render_diff(stdout, self.current_frame)?;
        self.render_status(stdout)
    }

    fn jump_to(&mut self, stdout: &mut io::Stdout, target: usize) -> Result<()> {
        self.current_frame = target;
        self.rebuild_grid(target)?;
        self.render_full(stdout)?;
        self.render_status(stdout)
    }

    // -----------------------------------------------------------------------
    // Grid management
    // -----------------------------------------------------------------------

    fn apply_frame(&mut self, index: usize) -> Result<()> {
        match &self.presentation.frames[index] {
            Frame::Full { cells } => {
                self.grid = cells.clone();
            }
            Frame::Diff { changes } => {
                for change in changes {
                    let x = change.x as usize;
                    let y = change.y as usize;
                    if y < self.grid.len() && x < self.grid[0].len() {
                        self.grid[y][x] = change.cell.clone();
                    }
                }
            }
        }
        Ok(())
    }

    fn rebuild_grid(&mut self, target: usize) -> Result<()> {
        let w = self.presentation.contract.width as usize;
        let h = self.presentation.contract.height as usize;
        self.grid = vec![vec![Cell::default(); w]; h];
        for i in 0..=target {
            self.apply_frame(i)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        let items: &[&str] = &[
            "[p] play/pause",
            "[←] prev",
            "[→][Space] next",
            "[Home] first",
            "[End] last",
            "[m] marker",
            "[q][Esc] quit",
            "[F11] full",
        ];

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_menu_item(stdout, item)?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_full(&self, stdout: &mut io::Stdout) -> Result<()> {
        for (y, row) in self.grid.iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
            for cell in row {
                let cs = to_content_style(&cell.style);
                queue!(
                    stdout,
                    style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
                )?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_diff(&self, stdout: &mut io::Stdout, frame_index: usize) -> Result<()> {
        match &self.presentation.frames[frame_index] {
            Frame::Diff { changes } => {
                for change in changes {
                    let cs = to_content_style(&change.cell.style);
                    queue!(
                        stdout,
                        cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                        style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
                    )?;
                }
                stdout.flush()?;
            }
            Frame::Full { .. } => {
                // Full frame, re-render everything.
                self.render_full(stdout)?;
            }
        }
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = self.presentation.contract.height + CANVAS_OFFSET;
        let (_, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        let total = self.presentation.frames.len();
        let marker = self
            .presentation
            .markers
            .iter()
            .find(|m| m.frame_index == self.current_frame)
            .map(|m| format!(" | {}", m.label))
            .unwrap_or_default();
        let status = format!(
            " Frame {}/{} | {:.0} fps {}{} ",
            self.current_frame + 1,
            total,
            self.presentation.frame_rate,
            if self.playing { "playing" } else { "paused" },
            marker,
        );

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        stdout.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}

// ---------------------------------------------------------------------------
// Menu bar
// ---------------------------------------------------------------------------

/// Print a menu item string, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
fn print_menu_item(stdout: &mut io::Stdout, item: &str) -> Result<()> {
    let mut rest = item;
    while !rest.is_empty() {
        if let Some(open) = rest.find('[') {
            if open > 0 {
                queue!(
                    stdout,
                    style::SetAttribute(style::Attribute::Dim),
                    style::Print(&rest[..open]),
                    style::SetAttribute(style::Attribute::Reset),
                )?;
            }
            rest = &rest[open..];
            if let Some(close) = rest.find(']') {
                queue!(
                    stdout,
                    style::SetAttribute(style::Attribute::Bold),
                    style::Print(&rest[..=close]),
                    style::SetAttribute(style::Attribute::Reset),
                )?;
                rest = &rest[close + 1..];
            } else {
                queue!(stdout, style::Print(rest))?;
                break;
            }
        } else {
            queue!(
                stdout,
                style::SetAttribute(style::Attribute::Dim),
                style::Print(rest),
                style::SetAttribute(style::Attribute::Reset),
            )?;
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellChange, Marker, TerminalContract};

    fn presentation(frame_rate: f64, markers: &[usize]) -> PlayablePresentation {
        let blank = vec![vec![Cell::default(); 2]; 1];
        let mut frames = vec![Frame::Full { cells: blank }];
        for i in 1..6u16 {
            frames.push(Frame::Diff {
                changes: vec![CellChange {
                    x: i % 2,
                    y: 0,
                    cell: Cell {
                        ch: char::from(b'0' + i as u8),
                        style: Style::default(),
                    },
                }],
            });
        }
        PlayablePresentation {
            contract: TerminalContract {
                width: 2,
                height: 1,
            },
            frame_rate,
            frames,
            markers: markers
                .iter()
                .map(|&frame_index| Marker {
                    frame_index,
                    label: format!("m{frame_index}"),
                })
                .collect(),
        }
    }

    #[test]
    fn autoplay_interval_follows_the_frame_rate() {
        let player = Player::new(presentation(25.0, &[]));
        assert_eq!(player.frame_interval(), Duration::from_millis(40));

        let broken = Player::new(presentation(0.0, &[]));
        assert_eq!(broken.frame_interval(), Duration::from_millis(33));
    }

    #[test]
    fn marker_jumps_move_forward_then_wrap() {
        let mut player = Player::new(presentation(30.0, &[2, 4]));
        assert_eq!(player.next_marker(), Some(2));
        player.current_frame = 2;
        assert_eq!(player.next_marker(), Some(4));
        player.current_frame = 5;
        assert_eq!(player.next_marker(), Some(2));

        let none = Player::new(presentation(30.0, &[]));
        assert_eq!(none.next_marker(), None);
    }

    #[test]
    fn rebuilding_replays_diffs_up_to_the_target() {
        let mut player = Player::new(presentation(30.0, &[]));
        player.rebuild_grid(3).unwrap();
        // Frame 3 wrote '3' at x 1 and frame 2 wrote '2' at x 0.
        assert_eq!(player.grid[0][0].ch, '2');
        assert_eq!(player.grid[0][1].ch, '3');
    }
}
