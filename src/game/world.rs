//! The snake simulation
//!
//! [`SnakeWorld`] owns the snake, the food and the score of one game and
//! advances them one cell per [`SnakeWorld::tick`]. It has no I/O: the host
//! decides when to tick and the presentation reacts to the [`TickEvent`]s.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IteratorRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::{
    config::WorldConfig,
    direction::Direction,
    error::WorldError,
    state::{CollisionCause, Playfield, Position, Snake},
};

/// Random probes before falling back to scanning every free cell
const SPAWN_ATTEMPTS: usize = 64;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvent {
    /// Cell the head moved to, or tried to move to on a terminal tick
    pub head: Position,
    pub ate_food: bool,
    pub ate_bonus: bool,
    pub bonus_spawned: bool,
    /// Set when this tick ended the game
    pub terminal: Option<CollisionCause>,
}

impl TickEvent {
    fn moved_to(head: Position) -> Self {
        Self {
            head,
            ate_food: false,
            ate_bonus: false,
            bonus_spawned: false,
            terminal: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }
}

/// Final outcome of a finished world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub cause: CollisionCause,
    pub final_score: u32,
}

impl From<GameOver> for WorldError {
    fn from(over: GameOver) -> Self {
        WorldError::GameOver {
            cause: over.cause,
            final_score: over.final_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Alive,
    Dead(CollisionCause),
}

/// State of one game, from start until the snake hits something
#[derive(Debug, Clone)]
pub struct SnakeWorld {
    config: WorldConfig,
    playfield: Playfield,
    snake: Snake,
    /// Last accepted turn, applied on the next tick
    pending_heading: Direction,
    food: Position,
    bonus: Option<Position>,
    food_count: u32,
    score: u32,
    status: Status,
    rng: StdRng,
}

impl SnakeWorld {
    /// Start a new game: a one-cell snake in the middle heading right
    pub fn new_game(seed: u64, config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;

        let playfield = Playfield::from_config(&config);
        let snake = Snake::new(playfield.center(), Direction::Right);

        let mut world = Self {
            playfield,
            pending_heading: snake.heading,
            food: snake.head(),
            snake,
            bonus: None,
            food_count: 0,
            score: 0,
            status: Status::Alive,
            rng: StdRng::seed_from_u64(seed),
            config,
        };

        // Validation guarantees a second cell, so this always moves the food off the snake
        if let Some(food) = world.spawn_food() {
            world.food = food;
        }

        info!(seed, head = ?world.snake.head(), food = ?world.food, "new game");
        Ok(world)
    }

    /// Queue a turn for the next tick
    ///
    /// Turns that would reverse the snake onto itself are ignored and
    /// return `false`.
    pub fn request_turn(&mut self, direction: Direction) -> bool {
        if self.snake.heading.is_opposite(direction) {
            trace!(?direction, heading = ?self.snake.heading, "ignoring reversing turn");
            return false;
        }

        self.pending_heading = direction;
        true
    }

    /// Advance the world by exactly one cell
    ///
    /// Returns [`WorldError::GameOver`] once the snake has collided; the
    /// colliding tick itself is reported through [`TickEvent::terminal`].
    pub fn tick(&mut self) -> Result<TickEvent, WorldError> {
        if let Some(over) = self.game_over() {
            return Err(over.into());
        }

        self.snake.heading = self.pending_heading;
        let new_head = self.snake.head().stepped(self.snake.heading, self.config.step);
        let mut event = TickEvent::moved_to(new_head);

        if let Some(cause) = self.check_collision(new_head) {
            self.status = Status::Dead(cause);
            event.terminal = Some(cause);
            info!(%cause, score = self.score, length = self.snake.len(), "game over");
            return Ok(event);
        }

        let ate_food = new_head == self.food;
        self.snake.advance(new_head, ate_food);

        if ate_food {
            event.ate_food = true;
            self.score = self.score.saturating_add(self.config.food_score);
            self.food_count += 1;
            if let Some(food) = self.spawn_food() {
                self.food = food;
            }
            debug!(score = self.score, food_count = self.food_count, next = ?self.food, "ate food");

            if self.food_count % self.config.bonus_every == 0 {
                // A full board keeps whatever bonus is already out
                if let Some(bonus) = self.spawn_bonus() {
                    self.bonus = Some(bonus);
                    event.bonus_spawned = true;
                    debug!(?bonus, "bonus food spawned");
                }
            }
        }

        if let Some(bonus) = self.bonus {
            if new_head.distance_to(bonus) < self.capture_distance() {
                self.bonus = None;
                self.score = self.score.saturating_add(self.config.bonus_score);
                event.ate_bonus = true;
                debug!(score = self.score, "ate bonus food");
            }
        }

        Ok(event)
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<CollisionCause> {
        if !self.playfield.contains(pos) {
            return Some(CollisionCause::Wall);
        }

        if self.snake.collides_with_body(pos) {
            return Some(CollisionCause::SelfCollision);
        }

        None
    }

    /// Head-to-bonus distance below which the bonus is eaten
    fn capture_distance(&self) -> f64 {
        f64::from(self.config.bonus_radius) + f64::from(self.config.step) / 2.0
    }

    /// Pick a random grid cell not covered by the snake
    fn spawn_food(&mut self) -> Option<Position> {
        let snake = &self.snake;
        random_cell(&mut self.rng, &self.playfield, |cell| !snake.occupies(cell))
    }

    /// Pick a grid cell clear of the snake and the food, out of immediate reach of the head
    fn spawn_bonus(&mut self) -> Option<Position> {
        let snake = &self.snake;
        let food = self.food;
        let head = snake.head();
        let reach = self.capture_distance();
        random_cell(&mut self.rng, &self.playfield, |cell| {
            cell != food && !snake.occupies(cell) && head.distance_to(cell) >= reach
        })
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn heading(&self) -> Direction {
        self.snake.heading
    }

    pub fn food(&self) -> Position {
        self.food
    }

    /// Position of the bonus food, if one is active
    pub fn bonus(&self) -> Option<Position> {
        self.bonus
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Normal foods eaten so far
    pub fn food_count(&self) -> u32 {
        self.food_count
    }

    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }

    /// Cause and final score once the snake has collided
    pub fn game_over(&self) -> Option<GameOver> {
        match self.status {
            Status::Alive => None,
            Status::Dead(cause) => Some(GameOver {
                cause,
                final_score: self.score,
            }),
        }
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }
}

/// Sample a cell accepted by `is_free`, probing randomly first and then scanning
fn random_cell(
    rng: &mut StdRng,
    playfield: &Playfield,
    is_free: impl Fn(Position) -> bool,
) -> Option<Position> {
    for _ in 0..SPAWN_ATTEMPTS {
        let column = rng.gen_range(0..playfield.columns());
        let row = rng.gen_range(0..playfield.rows());
        let cell = playfield.cell(column, row);
        if is_free(cell) {
            return Some(cell);
        }
    }

    playfield.cells().filter(|cell| is_free(*cell)).choose(rng)
}
