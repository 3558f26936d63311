//! Environment adapter - the reset/step contract over the game engine
//!
//! Autonomous callers (agents, replay tools, the human-play loop) drive the
//! game only through this crate:
//!
//! - [`TetrisEnv::reset`] builds a fresh game and returns its first observation
//! - [`TetrisEnv::step`] applies one discrete action (ordinal `0..6`)
//! - [`TetrisEnv::gravity`] applies one externally clocked gravity row
//! - [`TetrisEnv::observe`] snapshots the state without touching it
//!
//! `terminated` is set exactly on the call that ended the game. `truncated`
//! belongs to wrappers such as [`TimeLimit`].
//!
//! # Example
//!
//! ```
//! use tetris_gym_core::EngineConfig;
//! use tetris_gym_env::TetrisEnv;
//!
//! let mut env = TetrisEnv::with_seed(EngineConfig::default(), 7).unwrap();
//! let (obs, _info) = env.reset(Some(42)).unwrap();
//! assert!(obs.active_piece.is_some());
//!
//! let step = env.step(5).unwrap(); // hard drop
//! assert!(step.info.locked);
//! ```

pub mod env;
pub mod observation;
pub mod space;
pub mod time_limit;

pub use tetris_gym_core as core;
pub use tetris_gym_types as types;

pub use env::{Env, Step, StepInfo, TetrisEnv};
pub use observation::{ActivePiece, Anchor, Observation};
pub use space::ActionSpace;
pub use time_limit::{TimeLimit, DEFAULT_MAX_EPISODE_STEPS};
