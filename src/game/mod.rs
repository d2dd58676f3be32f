//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The host loop drives a [`Session`], which owns one [`SnakeWorld`] per game.

pub mod config;
pub mod direction;
pub mod error;
pub mod session;
pub mod state;
pub mod world;

// Re-export commonly used types
pub use config::{GameConfig, WorldConfig};
pub use direction::Direction;
pub use error::WorldError;
pub use session::{Phase, Session};
pub use state::{CollisionCause, Playfield, Position, Snake};
pub use world::{GameOver, SnakeWorld, TickEvent};
