use std::{thread::sleep, time::Instant};

use crate::{Coords, TermInt};
use crate::config::GameConfig;
use crate::term::TermManager;
use crate::state::{Command, GameOver, GameState};
use crate::snake::Direction::*;

use anyhow::{bail, Result};
use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use crossterm::style::Color;
use tracing::{info, trace};

// Every grid cell is two terminal columns wide so the arena looks square
const CELL_WIDTH: TermInt = 2;

const SNAKE_BODY_CELL: &str = "██";
const APPLE_CELL: &str = "()";
const EMPTY_CELL: &str = " .";
const DEAD_SNAKE_CELL: &str = "XX";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Input {
    Play(Command),
    Quit,
}

pub struct SnakeGame {
    state: GameState,
    term: TermManager,
}

impl SnakeGame {
    pub fn new(config: GameConfig) -> Result<Self> {
        let term = TermManager::new()?;
        Ok(SnakeGame { state: GameState::new(config), term })
    }

    pub fn run(&mut self) -> Result<()> {
        let grid = self.state.grid();
        let (cols, rows) = board_size(grid);
        let (width, height) = self.term.get_terminal_size();

        if (width as u32) < cols || (height as u32) < rows {
            bail!(
                "a {}x{} grid needs a terminal of at least {}x{}, this one is {}x{}",
                grid.0, grid.1, cols, rows, width, height
            );
        }

        self.term.setup()?;
        info!(width = grid.0, height = grid.1, ticks_per_second = self.state.ticks_per_second(), "game started");

        let result = self.game_loop();
        let restored = self.term.restore();
        result.and(restored)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_loop(&mut self) -> Result<()> {
        loop {
            let frame_start = Instant::now();

            for key_ev in self.term.read_key_events_queue()? {
                match read_input(&key_ev) {
                    Some(Input::Quit) => {
                        info!(score = self.state.score(), "quit");
                        return Ok(());
                    }
                    Some(Input::Play(command)) => {
                        if !self.state.handle(command) {
                            trace!(?command, "command ignored");
                        }
                    }
                    None => {}
                }
            }

            let event = self.state.update();
            trace!(?event, "tick");

            self.draw()?;

            // Speed up with higher scores
            if let Some(rest) = self.state.tick_interval().checked_sub(frame_start.elapsed()) {
                sleep(rest);
            }
        }
    }

    fn draw(&mut self) -> Result<()> {
        self.term.erase();

        let (term_width, term_height) = self.term.get_terminal_size();
        let (cols, rows) = board_size(self.state.grid());

        if cols > term_width as u32 || rows > term_height as u32 {
            let needed = format!("Need at least {}x{}", cols, rows);
            self.term.show_message(&["Terminal too small", needed.as_str()], Color::Yellow);
            return self.term.present();
        }

        let (cols, rows) = (cols as TermInt, rows as TermInt);
        let origin = ((term_width - cols) / 2, (term_height - rows) / 2);
        self.term.draw_borders(origin, (cols, rows), Color::White);

        let (grid_width, grid_height) = self.state.grid();
        for y in 0..grid_height {
            for x in 0..grid_width {
                self.term.print_str_at(screen_pos(origin, (x, y)), EMPTY_CELL, Color::DarkGrey);
            }
        }

        let apple = self.state.food();
        self.term.print_str_at(screen_pos(origin, apple), APPLE_CELL, Color::Red);

        let snake = self.state.snake();
        let crashed = self.state.game_over() == Some(GameOver::Crashed);
        let head: String = [snake.head_char(); 2].iter().collect();

        // Draw tail first so the head stays on top after wrapping overlaps
        for (i, pos) in snake.body().enumerate().rev() {
            let (cell, color) = if crashed {
                (DEAD_SNAKE_CELL, Color::Red)
            } else if i == 0 {
                (head.as_str(), Color::Yellow)
            } else {
                (SNAKE_BODY_CELL, Color::Green)
            };
            self.term.print_str_at(screen_pos(origin, *pos), cell, color);
        }

        let overlay = format!(" Score: {}  Speed: {} ", self.state.score(), self.state.ticks_per_second());
        self.term.print_str_at((origin.0 + 2, origin.1), &overlay, Color::White);

        self.show_banner();
        self.term.present()
    }

    fn show_banner(&mut self) {
        let score = format!("Score: {}", self.state.score());

        match self.state.game_over() {
            Some(reason) => {
                let title = if reason == GameOver::BoardFull {"You won!"} else {"Game over!"};
                self.term.show_message(&[
                    title,
                    score.as_str(),
                    "",
                    "Press R to play again,",
                    "or Q to quit."
                ], Color::White);
            }
            None if self.state.is_paused() => {
                self.term.show_message(&["Paused", "Press P or Esc to resume", "or Q to quit"], Color::White);
            }
            None => {}
        }
    }
}

/// Terminal columns and rows taken by the arena including its border.
fn board_size((width, height): Coords) -> (u32, u32) {
    (width as u32 * CELL_WIDTH as u32 + 2, height as u32 + 2)
}

fn screen_pos(origin: Coords, (x, y): Coords) -> Coords {
    (origin.0 + 1 + x * CELL_WIDTH, origin.1 + 1 + y)
}

fn read_input(ev: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(ev) {
        return Some(Input::Quit);
    }

    let command = match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Command::Turn(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Command::Turn(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Command::Turn(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Command::Turn(Right),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Command::TogglePause,
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Input::Quit),
        _ => return None,
    };

    Some(Input::Play(command))
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
