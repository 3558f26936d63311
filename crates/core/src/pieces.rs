//! Pieces module - tetromino shapes and the falling piece value type
//!
//! Every shape has four rotation entries, even when some are geometrically
//! identical (O, and the 180° pairs of I/S/Z), so rotation is always
//! `(index + 1) mod 4`. Offsets are `(column, row)` inside a 4x4 box whose
//! top-left corner is the piece anchor.

use serde::{Deserialize, Serialize};

use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
    }
}

fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Active falling piece.
///
/// A plain value: candidate transforms are built with [`Tetromino::shifted`]
/// and [`Tetromino::rotated`] and only committed after the board accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    /// Anchor column.
    pub x: i16,
    /// Anchor row (0 is the top).
    pub y: i16,
}

impl Tetromino {
    /// Piece in spawn orientation at the given anchor.
    pub fn new(kind: PieceKind, x: i16, y: i16) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute `(x, y)` board coordinates of the four minos.
    pub fn cells(&self) -> [(i16, i16); 4] {
        self.shape()
            .map(|(dx, dy)| (self.x + dx as i16, self.y + dy as i16))
    }

    pub fn shifted(&self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Same anchor, next clockwise orientation. No kick offsets are applied.
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.rotate_cw(),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PIECE_KINDS;

    const ROTATIONS: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    #[test]
    fn every_orientation_has_four_distinct_cells_inside_the_box() {
        for kind in PIECE_KINDS {
            for rotation in ROTATIONS {
                let shape = get_shape(kind, rotation);
                for (i, &(x, y)) in shape.iter().enumerate() {
                    assert!((0..4).contains(&x) && (0..4).contains(&y));
                    assert!(!shape[i + 1..].contains(&(x, y)), "{kind:?} {rotation:?}");
                }
            }
        }
    }

    #[test]
    fn four_rotations_return_to_start() {
        let piece = Tetromino::new(PieceKind::L, 3, 0);
        let back = piece.rotated().rotated().rotated().rotated();
        assert_eq!(piece, back);
    }

    #[test]
    fn cells_are_offsets_plus_anchor() {
        let piece = Tetromino::new(PieceKind::I, 3, 5);
        assert_eq!(piece.cells(), [(3, 6), (4, 6), (5, 6), (6, 6)]);
        assert_eq!(piece.shifted(-1, 1).cells()[0], (2, 7));
    }
}
