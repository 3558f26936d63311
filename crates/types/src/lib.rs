//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the engine, the environment
//! adapter, the renderer and the input translator alike.
//!
//! # Board Dimensions
//!
//! Standard playfield dimensions (the engine accepts other sizes through its
//! configuration):
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn position**: top-centre, `((width - 4) / 2, 0)` => (3, 0)
//!
//! # Tuning Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LINE_SCORES` | 0/40/100/300/1200 | Points per lock by rows cleared, times `level + 1` |
//! | `LINES_PER_LEVEL` | 10 | Lines needed per level |
//! | `DROP_INTERVALS` | 1000..160 | Gravity interval by level (ms per row) |
//! | `DROP_INTERVAL_FLOOR_MS` | 120 | Interval beyond the table |
//! | `SOFT_DROP_REWARD` | 1 | Shaping reward per soft-dropped row |
//! | `HARD_DROP_REWARD_PER_CELL` | 2 | Shaping reward per hard-dropped row |
//! | `GAME_OVER_PENALTY` | 100 | Subtracted from the reward of the losing call |
//!
//! # Examples
//!
//! ```
//! use tetris_gym_types::{Action, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
//!
//! assert_eq!(Action::from_index(5), Some(Action::HardDrop));
//! assert_eq!(Action::from_index(6), None);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u16 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u16 = 20;

/// Side of the box every piece orientation fits in.
pub const PIECE_BOX: u16 = 4;

/// Largest accepted board side. Coordinates are stored as `i16`.
pub const MAX_BOARD_DIM: u16 = 1024;

/// Lookahead pieces exposed by default.
pub const DEFAULT_PREVIEW: usize = 1;

/// Upper bound on lookahead (one full bag).
pub const MAX_PREVIEW: usize = 7;

/// Line clear scoring table (classic Nintendo scoring).
///
/// Points are multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Total lines cleared per level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Drop intervals by level (milliseconds per row)
///
/// Index 0 = Level 0, Index 8 = Level 8
pub const DROP_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Drop interval past the end of `DROP_INTERVALS`, and the floor for any configured table.
pub const DROP_INTERVAL_FLOOR_MS: u32 = 120;

pub const SOFT_DROP_REWARD: i64 = 1;

pub const HARD_DROP_REWARD_PER_CELL: i64 = 2;

pub const GAME_OVER_PENALTY: i64 = 100;

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Magenta, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// All kinds in catalog order. A fresh bag starts from this order.
pub const PIECE_KINDS: [PieceKind; 7] = [
    PieceKind::I,
    PieceKind::O,
    PieceKind::T,
    PieceKind::S,
    PieceKind::Z,
    PieceKind::J,
    PieceKind::L,
];

impl PieceKind {
    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_gym_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Grid code used in observations: I=1 .. L=7 (0 means empty).
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    /// Inverse of [`PieceKind::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Rotation states, clockwise from spawn.
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: Rotated 90° clockwise (index 1)
/// - **South**: Rotated 180° (index 2)
/// - **West**: Rotated 270° clockwise (index 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°), i.e. `(index + 1) mod 4`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_gym_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::East.rotate_cw(), Rotation::South);
    /// assert_eq!(Rotation::South.rotate_cw(), Rotation::West);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        Self::from_index((self.index() + 1) % 4)
    }

    /// Ordinal 0..=3.
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build from an ordinal; values are taken mod 4.
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }
}

/// Discrete actions accepted by the engine.
///
/// Ordinals are stable and form the environment's action space.
/// Quit/restart belong to the input translator, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Do nothing this step
    NoOp,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Drop piece one cell down; locks if it cannot move
    SoftDrop,
    /// Drop piece to the lowest valid position and lock
    HardDrop,
}

/// Number of discrete actions.
pub const ACTION_COUNT: u8 = 6;

impl Action {
    pub const ALL: [Action; ACTION_COUNT as usize] = [
        Action::NoOp,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Rotate,
        Action::SoftDrop,
        Action::HardDrop,
    ];

    /// Ordinal of this action.
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Action for an ordinal, `None` if out of range.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_gym_types::Action;
    ///
    /// assert_eq!(Action::from_str("left"), Some(Action::MoveLeft));
    /// assert_eq!(Action::from_str("HARD_DROP"), Some(Action::HardDrop));
    /// assert_eq!(Action::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "noop" | "no_op" | "nothing" => Some(Action::NoOp),
            "left" | "move_left" => Some(Action::MoveLeft),
            "right" | "move_right" => Some(Action::MoveRight),
            "rotate" => Some(Action::Rotate),
            "soft" | "soft_drop" => Some(Action::SoftDrop),
            "hard" | "hard_drop" => Some(Action::HardDrop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::NoOp => "no_op",
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::Rotate => "rotate",
            Action::SoftDrop => "soft_drop",
            Action::HardDrop => "hard_drop",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell locked by a piece of the given kind
pub type Cell = Option<PieceKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_ordinals_are_stable() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index() as usize, i);
            assert_eq!(Action::from_index(i as u8), Some(*action));
        }
        assert_eq!(Action::from_index(ACTION_COUNT), None);
        assert_eq!(Action::from_index(u8::MAX), None);
    }

    #[test]
    fn piece_codes_round_trip() {
        for kind in PIECE_KINDS {
            assert_eq!(PieceKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(PieceKind::from_code(0), None);
        assert_eq!(PieceKind::from_code(8), None);
    }

    #[test]
    fn rotation_index_wraps() {
        assert_eq!(Rotation::from_index(4), Rotation::North);
        assert_eq!(Rotation::West.index(), 3);
    }

    #[test]
    fn default_tables_match_classic_rules() {
        assert_eq!(LINE_SCORES, [0, 40, 100, 300, 1200]);
        assert_eq!(LINES_PER_LEVEL, 10);
        assert_eq!(DROP_INTERVALS[0], 1000);
        assert!(DROP_INTERVALS.windows(2).all(|w| w[0] > w[1]));
        assert!(DROP_INTERVAL_FLOOR_MS < DROP_INTERVALS[DROP_INTERVALS.len() - 1]);
    }
}
