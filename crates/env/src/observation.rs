//! Observation snapshot handed to agents, renderers and replay output.
//!
//! Built from a [`GameState`] by copying; nothing here can reach back into the
//! engine. Keys are named (serde) so consumers never depend on field order.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use tetris_gym_core::{GameState, Tetromino};
use tetris_gym_types::{PieceKind, Rotation, MAX_PREVIEW};

/// Top-left corner of a piece's 4x4 box in board coordinates.
///
/// Can sit outside the board (e.g. column -1 for an O against the left wall)
/// while every mino is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    /// Row, 0 is the top.
    pub row: i16,
    pub col: i16,
}

/// The falling piece as seen from outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivePiece {
    pub shape: PieceKind,
    /// Rotation index, 0..=3 clockwise from spawn.
    pub rotation: u8,
    pub anchor: Anchor,
}

impl ActivePiece {
    pub fn tetromino(&self) -> Tetromino {
        Tetromino {
            kind: self.shape,
            rotation: Rotation::from_index(self.rotation),
            x: self.anchor.col,
            y: self.anchor.row,
        }
    }

    /// Board `(col, row)` of the four minos.
    pub fn cells(&self) -> [(i16, i16); 4] {
        self.tetromino().cells()
    }
}

impl From<Tetromino> for ActivePiece {
    fn from(value: Tetromino) -> Self {
        Self {
            shape: value.kind,
            rotation: value.rotation.index(),
            anchor: Anchor {
                row: value.y,
                col: value.x,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    /// `height x width` locked cells: 0 empty, 1..=7 piece code (I O T S Z J L).
    pub grid: Vec<Vec<u8>>,
    /// `null` once the game is over.
    pub active_piece: Option<ActivePiece>,
    /// Upcoming pieces, nearest first.
    #[serde(rename = "next_piece")]
    pub next_pieces: ArrayVec<PieceKind, MAX_PREVIEW>,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub game_over: bool,
}

impl Observation {
    pub fn from_game(game: &GameState) -> Self {
        let mut grid = Vec::with_capacity(game.board().height() as usize);
        game.board().write_u8_grid(&mut grid);

        Self {
            grid,
            active_piece: game.active().map(ActivePiece::from),
            next_pieces: game.next_pieces(),
            score: game.score(),
            level: game.level(),
            lines_cleared: game.lines_cleared(),
            game_over: game.game_over(),
        }
    }

    /// Empty board, no piece. What an environment shows before its first reset.
    pub fn blank(width: u16, height: u16) -> Self {
        Self {
            grid: vec![vec![0; width as usize]; height as usize],
            active_piece: None,
            next_pieces: ArrayVec::new(),
            score: 0,
            level: 0,
            lines_cleared: 0,
            game_over: false,
        }
    }

    pub fn width(&self) -> usize {
        self.grid.first().map(Vec::len).unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.grid.len()
    }

    /// The grid with the active piece drawn in (same codes as locked cells).
    pub fn board_with_piece(&self) -> Vec<Vec<u8>> {
        let mut grid = self.grid.clone();
        if let Some(piece) = self.active_piece {
            let code = piece.shape.code();
            for (x, y) in piece.cells() {
                if x < 0 || y < 0 {
                    continue;
                }
                if let Some(cell) = grid
                    .get_mut(y as usize)
                    .and_then(|row| row.get_mut(x as usize))
                {
                    *cell = code;
                }
            }
        }
        grid
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_gym_core::EngineConfig;

    #[test]
    fn test_observation_matches_game() {
        let game = GameState::new(EngineConfig::default(), Some(42)).unwrap();
        let obs = Observation::from_game(&game);

        assert_eq!(obs.height(), 20);
        assert_eq!(obs.width(), 10);
        assert!(obs.grid.iter().flatten().all(|&c| c == 0));
        let active = obs.active_piece.unwrap();
        assert_eq!(active.tetromino(), game.active().unwrap());
        assert_eq!(obs.next_pieces.as_slice(), game.next_pieces().as_slice());
        assert!(!obs.game_over);
    }

    #[test]
    fn test_board_with_piece_overlays_active_cells() {
        let game = GameState::new(EngineConfig::default(), Some(42)).unwrap();
        let obs = Observation::from_game(&game);
        let overlay = obs.board_with_piece();
        let active = obs.active_piece.unwrap();

        let filled: usize = overlay.iter().flatten().filter(|&&c| c != 0).count();
        assert_eq!(filled, 4);
        for (x, y) in active.cells() {
            assert_eq!(overlay[y as usize][x as usize], active.shape.code());
        }
        // The locked grid itself is untouched.
        assert!(obs.grid.iter().flatten().all(|&c| c == 0));
    }

    #[test]
    fn test_json_uses_named_keys() {
        let game = GameState::new(EngineConfig::default(), Some(1)).unwrap();
        let json = Observation::from_game(&game).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        for key in [
            "grid",
            "active_piece",
            "next_piece",
            "score",
            "level",
            "lines_cleared",
            "game_over",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert!(value["active_piece"]["anchor"]["row"].is_i64());
        assert!(value["active_piece"]["anchor"]["col"].is_i64());
    }

    #[test]
    fn test_missing_piece_serializes_as_null() {
        let json = Observation::blank(4, 4).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["active_piece"].is_null());
        assert!(value.as_object().unwrap().contains_key("active_piece"));

        let back: Observation = serde_json::from_value(value).unwrap();
        assert!(back.active_piece.is_none());
    }

    #[test]
    fn test_blank_has_no_piece() {
        let obs = Observation::blank(6, 8);
        assert_eq!((obs.width(), obs.height()), (6, 8));
        assert!(obs.active_piece.is_none());
        assert_eq!(obs.board_with_piece(), obs.grid);
    }
}
