use std::time::Duration;

use crate::Coords;
use crate::config::GameConfig;
use crate::food::Food;
use crate::snake::{Snake, Direction, MoveResult};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Restart,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOver {
    /// The snake ran into itself.
    Crashed,
    /// The snake covers every cell, nothing left to eat.
    BoardFull,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickEvent {
    /// Paused or already over, nothing moved.
    Skipped,
    Moved,
    Ate { score: u32 },
    Ended(GameOver),
}

/// Everything a round of the game needs. Input, update and rendering all go
/// through this one value.
pub struct GameState {
    config: GameConfig,
    rng: StdRng,
    snake: Snake,
    food: Food,
    score: u32,
    speed_bonus: u32,
    paused: bool,
    game_over: Option<GameOver>,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (snake, food, game_over) = new_round(&config, &mut rng);

        GameState { config, rng, snake, food, score: 0, speed_bonus: 0, paused: false, game_over }
    }

    /// Starts a new round with fresh snake, food, score and flags. The RNG
    /// keeps its sequence.
    pub fn reset(&mut self) {
        let (snake, food, game_over) = new_round(&self.config, &mut self.rng);
        self.snake = snake;
        self.food = food;
        self.score = 0;
        self.speed_bonus = 0;
        self.paused = false;
        self.game_over = game_over;
    }

    /// Applies a player command. Returns whether it had any effect.
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::TogglePause => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
                true
            }
            Command::Turn(direction) if !self.paused && !self.is_over() => {
                self.snake.set_direction(direction);
                true
            }
            Command::Restart if self.is_over() => {
                info!(score = self.score, "restarting");
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Advances the game by one tick.
    pub fn update(&mut self) -> TickEvent {
        if self.paused || self.is_over() {
            return TickEvent::Skipped;
        }

        let new_head = match self.snake.move_step() {
            MoveResult::Crashed => return self.end(GameOver::Crashed),
            MoveResult::Moved { new_head, old_tail } => {
                trace!(?new_head, ?old_tail, direction = ?self.snake.get_direction(), "snake moved");
                new_head
            }
        };

        if new_head != self.food.position() {
            return TickEvent::Moved;
        }

        self.snake.grow();
        self.score += 1;
        debug!(score = self.score, "food eaten");

        if self.score % self.config.speed_step == 0 {
            self.speed_bonus += 1;
            debug!(ticks_per_second = self.ticks_per_second(), "speeding up");
        }

        let occupied = self.snake.occupied();
        if self.food.randomize(self.config.grid(), &occupied, &mut self.rng).is_none() {
            return self.end(GameOver::BoardFull);
        }
        debug_assert!(!self.snake.contains(self.food.position()));

        TickEvent::Ate { score: self.score }
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.config.base_speed.saturating_add(self.speed_bonus)
    }

    /// Time one frame should take at the current speed.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second().max(1)
    }

    pub fn grid(&self) -> Coords {
        self.config.grid()
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Coords {
        self.food.position()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> Option<GameOver> {
        self.game_over
    }

    pub fn is_over(&self) -> bool {
        self.game_over.is_some()
    }

    fn end(&mut self, reason: GameOver) -> TickEvent {
        info!(score = self.score, length = self.snake.len(), ?reason, "game over");
        self.game_over = Some(reason);
        TickEvent::Ended(reason)
    }
}

fn new_round(config: &GameConfig, rng: &mut StdRng) -> (Snake, Food, Option<GameOver>) {
    let grid = config.grid();
    let center = (grid.0 / 2, grid.1 / 2);
    let snake = Snake::new(center, config.initial_length, Direction::Right, grid);

    let mut food = Food::at(center);
    let game_over = match food.randomize(grid, &snake.occupied(), rng) {
        Some(_) => None,
        None => Some(GameOver::BoardFull),
    };

    (snake, food, game_over)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;

    fn seeded(width: u16, height: u16) -> GameState {
        let config = GameConfig { seed: Some(42), ..GameConfig::new(width, height) };
        GameState::new(config)
    }

    fn body(state: &GameState) -> Vec<Coords> {
        state.snake().body().copied().collect()
    }

    /// Puts the food on the cell the snake enters next.
    fn food_ahead(state: &mut GameState) {
        let (x, y) = state.snake.head();
        state.food = Food::at(((x + 1) % state.grid().0, y));
    }

    /// Parks the food where the snake heading right will not reach it soon.
    fn food_away(state: &mut GameState) {
        let (_, y) = state.snake.head();
        state.food = Food::at((0, (y + 2) % state.grid().1));
    }

    #[test]
    fn test_new_game() {
        let state = seeded(40, 30);
        assert_eq!(body(&state), vec![(20, 15), (19, 15), (18, 15), (17, 15)]);
        assert_eq!(state.snake().get_direction(), Right);
        assert_eq!(state.score(), 0);
        assert!(!state.is_paused());
        assert!(!state.is_over());
        assert!(!state.snake().contains(state.food()));
        assert_eq!(state.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_three_ticks_without_food() {
        let mut state = seeded(40, 30);
        food_away(&mut state);

        for _ in 0..3 {
            assert_eq!(state.update(), TickEvent::Moved);
        }

        assert_eq!(state.snake().len(), 4);
        assert_eq!(state.snake().head(), (23, 15));
    }

    #[test]
    fn test_eating_grows_on_next_tick() {
        let mut state = seeded(40, 30);
        food_ahead(&mut state);

        assert_eq!(state.update(), TickEvent::Ate { score: 1 });
        assert_eq!(state.score(), 1);
        assert!(state.snake().is_growing());
        assert!(!state.snake().contains(state.food()));
        assert_eq!(state.snake().len(), 4);

        food_away(&mut state);
        assert_eq!(state.update(), TickEvent::Moved);
        assert_eq!(state.snake().len(), 5);
        assert!(!state.snake().is_growing());
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let mut state = seeded(8, 6);
        for _ in 0..20 {
            food_ahead(&mut state);
            if let TickEvent::Ended(_) = state.update() {
                break;
            }
            assert!(!state.snake().contains(state.food()));
        }
    }

    #[test]
    fn test_speed_bonus_every_five_points() {
        let mut state = seeded(200, 5);
        let mut intervals = vec![];

        for score in 1..=15 {
            food_ahead(&mut state);
            assert_eq!(state.update(), TickEvent::Ate { score });
            intervals.push((score, state.ticks_per_second()));
        }

        assert_eq!(intervals[3], (4, 10));
        assert_eq!(intervals[4], (5, 11));
        assert_eq!(intervals[8], (9, 11));
        assert_eq!(intervals[9], (10, 12));
        assert_eq!(intervals[14], (15, 13));
        assert!(state.tick_interval() < Duration::from_millis(100));
    }

    #[test]
    fn test_reverse_input_keeps_heading() {
        let mut state = seeded(40, 30);
        food_away(&mut state);

        assert!(state.handle(Command::Turn(Left)));
        state.update();

        assert_eq!(state.snake().get_direction(), Right);
        assert_eq!(state.snake().head(), (21, 15));
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut state = seeded(40, 30);
        state.food = Food::at((0, 0));
        state.snake.grow();

        state.update();
        state.handle(Command::Turn(Down));
        state.update();
        state.handle(Command::Turn(Left));
        state.update();

        let before = body(&state);
        state.handle(Command::Turn(Up));
        assert_eq!(state.update(), TickEvent::Ended(GameOver::Crashed));
        assert_eq!(state.game_over(), Some(GameOver::Crashed));
        assert_eq!(body(&state), before);

        assert_eq!(state.update(), TickEvent::Skipped);
        assert_eq!(body(&state), before);
    }

    #[test]
    fn test_pause_skips_updates_and_turns() {
        let mut state = seeded(40, 30);
        food_away(&mut state);

        assert!(state.handle(Command::TogglePause));
        assert!(state.is_paused());
        assert_eq!(state.update(), TickEvent::Skipped);
        assert_eq!(state.snake().head(), (20, 15));

        assert!(!state.handle(Command::Turn(Up)));

        state.handle(Command::TogglePause);
        assert_eq!(state.update(), TickEvent::Moved);
        assert_eq!(state.snake().head(), (21, 15));
    }

    #[test]
    fn test_restart_only_when_over() {
        let mut state = seeded(40, 30);
        food_ahead(&mut state);
        state.update();
        assert!(!state.handle(Command::Restart));
        assert_eq!(state.score(), 1);

        state.game_over = Some(GameOver::Crashed);
        state.paused = true;
        assert!(!state.handle(Command::Turn(Up)));
        assert!(state.handle(Command::Restart));

        assert_eq!(state.score(), 0);
        assert_eq!(state.ticks_per_second(), 10);
        assert!(!state.is_over());
        assert!(!state.is_paused());
        assert_eq!(state.snake().len(), 4);
        assert_eq!(state.snake().head(), (20, 15));
        assert!(!state.snake().contains(state.food()));
    }

    #[test]
    fn test_filling_the_board_wins() {
        // 5x1 strip: the snake starts with 4 cells, one free cell for food.
        let mut state = seeded(5, 1);
        assert_eq!(body(&state), vec![(2, 0), (1, 0), (0, 0), (4, 0)]);
        assert_eq!(state.food(), (3, 0));

        // The tail moves off (4, 0) and the food is placed there.
        assert_eq!(state.update(), TickEvent::Ate { score: 1 });
        assert_eq!(state.food(), (4, 0));

        // Growing into the last free cell leaves nowhere for the next food.
        assert_eq!(state.update(), TickEvent::Ended(GameOver::BoardFull));
        assert_eq!(state.snake().len(), 5);
        assert_eq!(state.score(), 2);
        assert_eq!(state.game_over(), Some(GameOver::BoardFull));
    }
}
