use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use arcade_snake::game::GameConfig;
use arcade_snake::modes::HumanMode;

#[derive(Parser)]
#[command(name = "arcade_snake")]
#[command(version, about = "Arcade Snake with bonus food")]
struct Cli {
    /// JSON configuration file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Screen width in pixels
    #[arg(long)]
    width: Option<i32>,

    /// Screen height in pixels
    #[arg(long)]
    height: Option<i32>,

    /// Wall thickness in pixels
    #[arg(long)]
    wall: Option<i32>,

    /// Cell size in pixels
    #[arg(long)]
    step: Option<i32>,

    /// Milliseconds between snake moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement; random when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the terminal bell cues
    #[arg(long)]
    no_sound: bool,

    /// Draw the snake body in a single colour
    #[arg(long)]
    no_gradient: bool,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.world.screen_width = width;
        }
        if let Some(height) = self.height {
            config.world.screen_height = height;
        }
        if let Some(wall) = self.wall {
            config.world.wall_thickness = wall;
        }
        if let Some(step) = self.step {
            config.world.step = step;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.no_sound {
            config.sound = false;
        }
        if self.no_gradient {
            config.gradient = false;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

/// The TUI owns the terminal, so logs only go to a file when asked for
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file =
        File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, ?config, "starting");

    let mut human_mode = HumanMode::new(config, seed)?;
    human_mode.run().await?;

    Ok(())
}
