use thiserror::Error;

use crate::GridInt;

pub const DEFAULT_WIDTH: GridInt = 40;
pub const DEFAULT_HEIGHT: GridInt = 30;
pub const DEFAULT_SPEED: u32 = 10;
const INITIAL_SNAKE_LENGTH: GridInt = 4;
const POINTS_PER_SPEED_UP: u32 = 5;

/// Largest arena side that still fits a terminal row once every cell is drawn
/// two columns wide.
pub const MAX_GRID_SIDE: GridInt = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be between 1 and {max} cells on each side, got {width}x{height}")]
    GridOutOfRange { width: GridInt, height: GridInt, max: GridInt },
    #[error("grid is {width} cells wide but the snake starts {length} cells long")]
    GridTooNarrow { width: GridInt, length: GridInt },
    #[error("a {width}x{height} grid leaves no room for food next to a {length} cell snake")]
    NoRoomForFood { width: GridInt, height: GridInt, length: GridInt },
    #[error("base speed must be at least 1 tick per second")]
    ZeroSpeed,
    #[error("speed-up interval must be at least 1 point")]
    ZeroSpeedStep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub grid_width: GridInt,
    pub grid_height: GridInt,
    pub initial_length: GridInt,
    /// Ticks per second at score zero.
    pub base_speed: u32,
    /// Every time the score reaches a multiple of this, the game ticks once
    /// more per second.
    pub speed_step: u32,
    /// Fixed RNG seed for food placement. Random when unset.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_width: DEFAULT_WIDTH,
            grid_height: DEFAULT_HEIGHT,
            initial_length: INITIAL_SNAKE_LENGTH,
            base_speed: DEFAULT_SPEED,
            speed_step: POINTS_PER_SPEED_UP,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(width: GridInt, height: GridInt) -> Self {
        GameConfig { grid_width: width, grid_height: height, ..Default::default() }
    }

    pub fn grid(&self) -> (GridInt, GridInt) {
        (self.grid_width, self.grid_height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = self.grid();
        let length = self.initial_length.max(1);

        if width == 0 || height == 0 || width > MAX_GRID_SIDE || height > MAX_GRID_SIDE {
            return Err(ConfigError::GridOutOfRange { width, height, max: MAX_GRID_SIDE });
        }

        if width < length {
            return Err(ConfigError::GridTooNarrow { width, length });
        }

        if width as u32 * height as u32 <= length as u32 {
            return Err(ConfigError::NoRoomForFood { width, height, length });
        }

        if self.base_speed == 0 {
            return Err(ConfigError::ZeroSpeed);
        }

        if self.speed_step == 0 {
            return Err(ConfigError::ZeroSpeedStep);
        }

        Ok(())
    }
}
