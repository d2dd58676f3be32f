//! Arcade Snake - a terminal Snake game with bonus food
//!
//! This library provides:
//! - Core game logic and the menu/play/game-over session (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering and sound cues (render module)
//! - Per-run statistics (metrics module)
//! - The interactive host loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
