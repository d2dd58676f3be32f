use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::WorldConfig;
use super::direction::Direction;

/// A position on the playfield, in screen units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position `step` units in a direction
    pub fn stepped(&self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * step, dy * step)
    }

    /// Euclidean distance between two positions
    pub fn distance_to(&self, other: Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }
}

/// Interior of the walls, where the snake may legally move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playfield {
    pub min_x: i32,
    pub min_y: i32,
    /// Exclusive upper bound
    pub max_x: i32,
    /// Exclusive upper bound
    pub max_y: i32,
    pub step: i32,
}

impl Playfield {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            min_x: config.wall_thickness,
            min_y: config.wall_thickness,
            max_x: config.screen_width - config.wall_thickness,
            max_y: config.screen_height - config.wall_thickness,
            step: config.step,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min_x && pos.x < self.max_x && pos.y >= self.min_y && pos.y < self.max_y
    }

    /// Number of whole grid columns
    pub fn columns(&self) -> i32 {
        (self.max_x - self.min_x) / self.step
    }

    /// Number of whole grid rows
    pub fn rows(&self) -> i32 {
        (self.max_y - self.min_y) / self.step
    }

    /// Position of the cell at grid coordinates (column, row)
    pub fn cell(&self, column: i32, row: i32) -> Position {
        Position::new(self.min_x + column * self.step, self.min_y + row * self.step)
    }

    /// Grid coordinates of a cell-aligned position
    pub fn grid_coords(&self, pos: Position) -> (i32, i32) {
        ((pos.x - self.min_x) / self.step, (pos.y - self.min_y) / self.step)
    }

    /// The cell nearest the screen centre
    pub fn center(&self) -> Position {
        self.cell(self.columns() / 2, self.rows() / 2)
    }

    /// All grid cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows()).flat_map(move |row| (0..self.columns()).map(move |col| self.cell(col, row)))
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub heading: Direction,
}

impl Snake {
    /// Create a snake of one segment
    pub fn new(head: Position, heading: Direction) -> Self {
        Self {
            body: vec![head],
            heading,
        }
    }

    /// Create a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Position>, heading: Direction) -> Self {
        debug_assert!(!body.is_empty());
        Self { body, heading }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if any segment, head included, occupies the position
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Put a new head in front, dropping the tail unless growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// What ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionCause {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

impl fmt::Display for CollisionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionCause::Wall => write!(f, "hit the wall"),
            CollisionCause::SelfCollision => write!(f, "ran into itself"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(50, 50);
        assert_eq!(pos.stepped(Direction::Right, 10), Position::new(60, 50));
        assert_eq!(pos.stepped(Direction::Left, 10), Position::new(40, 50));
        assert_eq!(pos.stepped(Direction::Down, 10), Position::new(50, 60));
        assert_eq!(pos.stepped(Direction::Up, 10), Position::new(50, 40));
    }

    #[test]
    fn test_distance() {
        let a = Position::new(0, 0);
        assert_eq!(a.distance_to(Position::new(3, 4)), 5.0);
        assert_eq!(a.distance_to(a), 0.0);
    }

    #[test]
    fn test_playfield_bounds() {
        let field = Playfield::from_config(&WorldConfig::default());

        assert!(field.contains(Position::new(20, 20)));
        assert!(field.contains(Position::new(770, 570)));
        assert!(!field.contains(Position::new(780, 300)));
        assert!(!field.contains(Position::new(10, 300)));
        assert!(!field.contains(Position::new(400, 580)));
        assert!(!field.contains(Position::new(400, 10)));
    }

    #[test]
    fn test_playfield_grid() {
        let field = Playfield::from_config(&WorldConfig::default());

        assert_eq!(field.columns(), 76);
        assert_eq!(field.rows(), 56);
        assert_eq!(field.center(), Position::new(400, 300));
        assert_eq!(field.grid_coords(Position::new(400, 300)), (38, 28));
        assert_eq!(field.cells().count(), 76 * 56);
        assert!(field.cells().all(|cell| field.contains(cell)));
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::from_segments(
            vec![Position::new(50, 50), Position::new(40, 50), Position::new(30, 50)],
            Direction::Right,
        );

        snake.advance(Position::new(60, 50), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(60, 50));
        assert!(!snake.occupies(Position::new(30, 50)));

        snake.advance(Position::new(70, 50), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(70, 50));
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake::from_segments(
            vec![Position::new(50, 50), Position::new(40, 50), Position::new(30, 50)],
            Direction::Right,
        );
        assert!(!snake.collides_with_body(Position::new(50, 50))); // head
        assert!(snake.collides_with_body(Position::new(40, 50))); // body
        assert!(snake.collides_with_body(Position::new(30, 50))); // tail
        assert!(!snake.collides_with_body(Position::new(100, 100))); // empty
    }

    #[test]
    fn test_collision_cause_display() {
        assert_eq!(CollisionCause::Wall.to_string(), "hit the wall");
        assert_eq!(CollisionCause::SelfCollision.to_string(), "ran into itself");
    }
}
