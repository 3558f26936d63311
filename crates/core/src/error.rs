//! Engine error type.
//!
//! Every rejected call leaves the engine untouched. Game over is not an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Action ordinal outside the action enumeration.
    #[error("invalid action {value}: expected 0..{max}")]
    InvalidAction { value: u8, max: u8 },
    /// Mutating call in a state that does not accept it (e.g. after game over).
    #[error("invalid state transition: {reason}")]
    InvalidStateTransition { reason: &'static str },
    /// Malformed engine configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl EngineError {
    pub(crate) fn game_over() -> Self {
        EngineError::InvalidStateTransition {
            reason: "game is over, reset before stepping",
        }
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
