//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer. Observations are drawn into a plain
//! framebuffer ([`GameView`]) which a [`TerminalRenderer`] then flushes to the
//! terminal. Nothing here can mutate the engine: the only input is an
//! [`env::Observation`] borrowed read-only.
//!
//! - Board cells are 2 characters wide to offset the terminal glyph aspect ratio
//! - Three screens: start, playing, game over ([`RenderMode`])
//! - [`FrameBuffer::to_text`] gives the textual frame for tests and logs

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetris_gym_core as core;
pub use tetris_gym_env as env;
pub use tetris_gym_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, RenderMode, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
