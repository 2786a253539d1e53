use std::{env, fs::File, sync::Mutex};

use anyhow::{Context, anyhow};
use tracing::info;
use tracing_subscriber::EnvFilter;

use grid_snake::app::SnakeApp;
use grid_snake::config::GameConfig;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = GameConfig::from_env().context("invalid game configuration")?;
    info!(cols = config.cols, rows = config.rows, speed = config.speed, "starting");

    let mut game = SnakeApp::new(config).context("could not start the game")?;
    // The game loop takes care of restoring the terminal on CTRL+C
    game.run()?;
    Ok(())
}

/// The terminal belongs to the game, so logs only go to the file named by
/// `SNAKE_LOG`. Filtering follows `RUST_LOG` and defaults to `info`.
fn init_logging() -> anyhow::Result<()> {
    let path = match env::var("SNAKE_LOG") {
        Ok(path) => path,
        Err(_) => return Ok(()),
    };

    let file = File::create(&path).with_context(|| format!("could not open log file {}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}
