use thiserror::Error;

use super::state::CollisionCause;

/// Errors surfaced by the simulation core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The world already ended; no further ticks are accepted
    #[error("game over: snake {cause}, final score {final_score}")]
    GameOver {
        cause: CollisionCause,
        final_score: u32,
    },

    #[error("invalid world configuration: {0}")]
    InvalidConfig(String),
}
