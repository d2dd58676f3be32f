//! Menu / playing / game-over flow around a [`SnakeWorld`]

use tracing::info;

use super::{
    config::WorldConfig,
    direction::Direction,
    error::WorldError,
    state::CollisionCause,
    world::{SnakeWorld, TickEvent},
};

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    GameOver {
        cause: CollisionCause,
        final_score: u32,
    },
}

/// One player's sequence of games
pub struct Session {
    config: WorldConfig,
    phase: Phase,
    world: Option<SnakeWorld>,
    base_seed: u64,
    games_started: u64,
}

impl Session {
    /// Create a session sitting on the menu
    pub fn new(config: WorldConfig, base_seed: u64) -> Result<Self, WorldError> {
        config.validate()?;

        Ok(Self {
            config,
            phase: Phase::Menu,
            world: None,
            base_seed,
            games_started: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current or last finished world, if any
    pub fn world(&self) -> Option<&SnakeWorld> {
        self.world.as_ref()
    }

    /// Begin a new game from the menu or the game-over screen
    ///
    /// Returns false while a game is already running.
    pub fn start(&mut self) -> Result<bool, WorldError> {
        if self.phase == Phase::Playing {
            return Ok(false);
        }

        let seed = self.base_seed.wrapping_add(self.games_started);
        self.world = Some(SnakeWorld::new_game(seed, self.config.clone())?);
        self.games_started += 1;
        self.phase = Phase::Playing;
        info!(game = self.games_started, seed, "game started");
        Ok(true)
    }

    /// Start over after a game ended
    pub fn restart(&mut self) -> Result<bool, WorldError> {
        match self.phase {
            Phase::GameOver { .. } => self.start(),
            _ => Ok(false),
        }
    }

    /// Leave the game-over screen for the menu
    pub fn to_menu(&mut self) -> bool {
        match self.phase {
            Phase::GameOver { .. } => {
                self.world = None;
                self.phase = Phase::Menu;
                true
            }
            _ => false,
        }
    }

    /// Forward a turn to the running world
    pub fn turn(&mut self, direction: Direction) -> bool {
        match (&self.phase, self.world.as_mut()) {
            (Phase::Playing, Some(world)) => world.request_turn(direction),
            _ => false,
        }
    }

    /// Advance the running world, moving to game over on a collision
    ///
    /// Returns `None` outside of the playing phase.
    pub fn tick(&mut self) -> Option<TickEvent> {
        if self.phase != Phase::Playing {
            return None;
        }

        let world = self.world.as_mut()?;
        match world.tick() {
            Ok(event) => {
                if let Some(cause) = event.terminal {
                    self.phase = Phase::GameOver {
                        cause,
                        final_score: world.score(),
                    };
                }
                Some(event)
            }
            // Only reachable if the world died without the phase noticing
            Err(WorldError::GameOver { cause, final_score }) => {
                self.phase = Phase::GameOver { cause, final_score };
                None
            }
            Err(WorldError::InvalidConfig(_)) => None,
        }
    }

    pub fn games_started(&self) -> u64 {
        self.games_started
    }
}
