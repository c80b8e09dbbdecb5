use crate::{TermInt, Coords};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};
use tracing::debug;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell { ch: ' ', color: Color::Reset };

/// Owns the terminal while the game runs. Drawing goes into `screen`;
/// `present` sends only the cells that differ from what is already shown.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Cell>,
    shown: Vec<Cell>,
    active: bool,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Failed to read terminal size")?;
        let stdout = stdout();
        let screen = vec![BLANK; width as usize * height as usize];
        let shown = screen.clone();
        Ok(TermManager { width, height, stdout, screen, shown, active: false })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        self.active = true;
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Failed to hide cursor")?;
        self.clear()
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)
            .context("Failed to show cursor")?;
        execute!(self.stdout, LeaveAlternateScreen).context("Failed to leave alternate screen")?;
        Ok(())
    }

    /// Drains every pending key press without blocking. Resize events are
    /// handled here as well.
    pub fn read_key_events_queue(&mut self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0)).context("Failed to poll terminal events")? {
            match read().context("Failed to read terminal event")? {
                Event::Key(ev) => events.push(ev),
                Event::Resize(w, h) => self.resize(w, h)?,
                _ => {}
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Blanks the drawing buffer. Nothing reaches the terminal until `present`.
    pub fn erase(&mut self) {
        for cell in self.screen.iter_mut() {
            *cell = BLANK;
        }
    }

    pub fn draw_borders(&mut self, top_left: Coords, size: Coords, color: Color) {
        let (left, top) = top_left;
        let (width, height) = size;
        if width < 2 || height < 2 {
            return;
        }

        let end_x = left + width - 1;
        let end_y = top + height - 1;

        for x in left..=end_x {
            let ch = if x == left || x == end_x {'+'} else {'-'};
            self.print_at((x, top), ch, color);
            self.print_at((x, end_y), ch, color);
        }

        for y in top + 1..end_y {
            self.print_at((left, y), '|', color);
            self.print_at((end_x, y), '|', color);
        }
    }

    /// Draws a box with the given lines centred on the screen, on top of
    /// whatever is already in the buffer.
    pub fn show_message(&mut self, lines: &[&str], color: Color) {
        let text_width = lines.iter().map(|x| x.chars().count()).max().unwrap_or(0);
        let msg = Message::centered(text_width as TermInt + 4, lines.len() as TermInt + 2, (self.width, self.height));
        let (left, top) = msg.top_left();

        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                self.print_at((left + x_diff, top + y_diff), ' ', color);
            }
        }
        self.draw_borders(msg.top_left(), (msg.width(), msg.height()), color);

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = (msg.width() as usize).saturating_sub(2));
            let y = top + i as TermInt + 1;
            self.print_str_at((left + 1, y), &padded_line, color);
        }
    }

    pub fn print_at(&mut self, pos: Coords, ch: char, color: Color) {
        if let Some(idx) = self.index(pos) {
            self.screen[idx] = Cell { ch, color };
        }
    }

    pub fn print_str_at(&mut self, pos: Coords, text: &str, color: Color) {
        for (x_diff, ch) in text.chars().enumerate() {
            let x = pos.0 as usize + x_diff;
            if x > TermInt::MAX as usize {
                break;
            }
            self.print_at((x as TermInt, pos.1), ch, color);
        }
    }

    /// Writes the cells that changed since the last call and flushes.
    pub fn present(&mut self) -> Result<()> {
        let mut color = None;

        for (idx, cell) in self.screen.iter().enumerate() {
            if self.shown[idx] == *cell {
                continue;
            }

            let x = (idx % self.width as usize) as TermInt;
            let y = (idx / self.width as usize) as TermInt;
            queue!(self.stdout, cursor::MoveTo(x, y)).context("Failed to move cursor")?;

            if color != Some(cell.color) {
                queue!(self.stdout, style::SetForegroundColor(cell.color)).context("Failed to set color")?;
                color = Some(cell.color);
            }
            queue!(self.stdout, style::Print(cell.ch)).context("Failed to print cell")?;
        }

        self.shown.copy_from_slice(&self.screen);
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Failed to flush stdout")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Failed to clear terminal")?;
        self.erase();
        self.shown.copy_from_slice(&self.screen);
        Ok(())
    }

    fn resize(&mut self, width: TermInt, height: TermInt) -> Result<()> {
        debug!(width, height, "terminal resized");
        self.width = width;
        self.height = height;
        self.screen = vec![BLANK; width as usize * height as usize];
        self.shown = self.screen.clone();
        self.clear()
    }

    fn index(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Nowhere left to report errors to
        let _ = self.restore();
    }
}

impl Message {
    pub fn centered(width: TermInt, height: TermInt, screen: Coords) -> Self {
        let width = width.min(screen.0);
        let height = height.min(screen.1);
        let top_left = ((screen.0 - width) / 2, (screen.1 - height) / 2);
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}
