//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`InputEvent`]s (engine actions plus the
//! front-end's start/restart/quit) and hands them to the game loop through a
//! latest-value [`ActionSlot`]. The engine never reads input itself.

pub mod map;
pub mod slot;

pub use tetris_gym_types as types;

pub use map::{map_key, should_quit, InputEvent};
pub use slot::{action_slot, spawn_key_pump, ActionSlot, SlotWriter};
