//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules of the game and nothing else. It has no
//! dependencies on terminals, clocks, or I/O, which makes it:
//!
//! - **Deterministic**: the same seed and the same call sequence produce
//!   identical games (required for training and replay)
//! - **Portable**: drives a terminal front-end and a headless environment alike
//!
//! # Module Structure
//!
//! - [`board`]: `W x H` grid with collision testing and row clearing
//! - [`pieces`]: tetromino shape tables and the falling piece value
//! - [`rng`]: 7-bag piece generator on a seedable ChaCha stream
//! - [`scoring`]: line points, levels and gravity intervals
//! - [`config`]: serde-friendly engine configuration
//! - [`game_state`]: spawn / fall / lock / clear state machine
//! - [`error`]: the engine error type
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every run of seven pieces holds each kind once
//! - **Rotation**: clockwise only, rejected on collision (no wall kicks)
//! - **Locking**: a piece locks as soon as a downward step is blocked
//! - **Scoring**: classic line table times `level + 1`, level every ten lines
//!
//! Time is not modelled here. The driver calls
//! [`GameState::gravity_step`](game_state::GameState::gravity_step) once per
//! [`GameState::drop_interval_ms`](game_state::GameState::drop_interval_ms).
//!
//! # Example
//!
//! ```
//! use tetris_gym_core::{EngineConfig, GameState};
//! use tetris_gym_core::types::Action;
//!
//! let mut game = GameState::new(EngineConfig::default(), Some(12345)).unwrap();
//!
//! game.apply_action(Action::MoveRight).unwrap();
//! game.apply_action(Action::Rotate).unwrap();
//! let result = game.apply_action(Action::HardDrop).unwrap();
//!
//! assert!(result.locked);
//! assert_eq!(game.board().occupied_count(), 4);
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;

pub use tetris_gym_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use game_state::{GameState, MoveResult, Phase};
pub use pieces::{get_shape, Tetromino};
pub use rng::PieceQueue;
pub use scoring::ScoringConfig;
