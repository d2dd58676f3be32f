use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::WorldError;

/// Largest number of columns or rows a playfield may have
pub const MAX_GRID_SIDE: i64 = 1024;

/// Geometry and scoring rules of a single world
///
/// All lengths are in screen units; the playfield is the screen minus a wall
/// of `wall_thickness` on every side, divided into square cells of `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub wall_thickness: i32,
    /// Cell size, also the distance the head moves per tick
    pub step: i32,
    /// Radius of the bonus food used by the capture test
    pub bonus_radius: i32,
    /// A bonus appears after every `bonus_every` normal foods
    pub bonus_every: u32,
    pub food_score: u32,
    pub bonus_score: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            wall_thickness: 20,
            step: 10,
            bonus_radius: 10,
            bonus_every: 5,
            food_score: 5,
            bonus_score: 10,
        }
    }
}

impl WorldConfig {
    /// Create a configuration with custom geometry and default scoring
    pub fn new(screen_width: i32, screen_height: i32, wall_thickness: i32, step: i32) -> Self {
        Self {
            screen_width,
            screen_height,
            wall_thickness,
            step,
            ..Default::default()
        }
    }

    /// Reject configurations the simulation cannot run on
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.step <= 0 {
            return Err(WorldError::InvalidConfig(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if self.wall_thickness < 0 {
            return Err(WorldError::InvalidConfig(format!(
                "wall thickness must not be negative, got {}",
                self.wall_thickness
            )));
        }
        if self.bonus_radius < 0 {
            return Err(WorldError::InvalidConfig(format!(
                "bonus radius must not be negative, got {}",
                self.bonus_radius
            )));
        }
        if self.bonus_every == 0 {
            return Err(WorldError::InvalidConfig(
                "bonus_every must be at least 1".to_string(),
            ));
        }

        // Widened so huge screens or walls cannot overflow
        let inner_width = i64::from(self.screen_width) - 2 * i64::from(self.wall_thickness);
        let inner_height = i64::from(self.screen_height) - 2 * i64::from(self.wall_thickness);
        let columns = inner_width.max(0) / i64::from(self.step);
        let rows = inner_height.max(0) / i64::from(self.step);

        // Snake and food need a cell each
        if columns * rows < 2 {
            return Err(WorldError::InvalidConfig(format!(
                "playfield {}x{} with step {} leaves fewer than two cells",
                inner_width, inner_height, self.step
            )));
        }
        if columns > MAX_GRID_SIDE || rows > MAX_GRID_SIDE {
            return Err(WorldError::InvalidConfig(format!(
                "playfield of {}x{} cells exceeds the {} cell limit per side",
                columns, rows, MAX_GRID_SIDE
            )));
        }

        Ok(())
    }
}

/// Full configuration of a play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    /// Milliseconds between two simulation ticks
    pub tick_interval_ms: u64,
    /// Ring the terminal bell on eat, bonus and game over
    pub sound: bool,
    /// Shade the snake body from head to tail
    pub gradient: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            tick_interval_ms: 100,
            sound: true,
            gradient: true,
        }
    }
}

impl GameConfig {
    /// Load a configuration from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_json_str(&raw).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the world geometry and the tick rate
    pub fn validate(&self) -> Result<(), WorldError> {
        self.world.validate()?;
        if self.tick_interval_ms == 0 {
            return Err(WorldError::InvalidConfig(
                "tick interval must be at least 1 ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a small playfield for testing
    pub fn small() -> Self {
        Self {
            world: WorldConfig::new(120, 120, 10, 10),
            ..Default::default()
        }
    }
}
