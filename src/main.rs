mod config;
mod food;
mod game;
mod snake;
mod state;
mod term;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{GameConfig, DEFAULT_HEIGHT, DEFAULT_SPEED, DEFAULT_WIDTH};

pub type TermInt = u16;
pub type GridInt = u16;
pub type Coords = (u16, u16);

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Classic snake in the terminal")]
struct Cli {
    /// Arena width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: GridInt,

    /// Arena height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: GridInt,

    /// Ticks per second before any speed-up
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    speed: u32,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Logs go to stderr, the game owns stdout: RUST_LOG=debug snake 2>snake.log
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = GameConfig {
        base_speed: cli.speed,
        seed: cli.seed,
        ..GameConfig::new(cli.width, cli.height)
    };
    config.validate()?;

    // The game takes care of restoring the terminal on every way out
    let mut game = game::SnakeGame::new(config)?;
    game.run()
}
