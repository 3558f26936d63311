//! Tetris gym (workspace facade crate).
//!
//! Re-exports the member crates under stable module names
//! (`tetris_gym::{types, core, env, input, term}`) and holds the pieces the
//! two binaries share: environment-variable settings, logging setup and the
//! headless replay driver.

pub use tetris_gym_core as core;
pub use tetris_gym_env as env;
pub use tetris_gym_input as input;
pub use tetris_gym_term as term;
pub use tetris_gym_types as types;

pub mod replay;
pub mod settings;

pub use settings::{init_tracing, LogTarget, Settings};
