//! Board module - manages the locked-cell grid
//!
//! The board is a `width x height` grid where each cell is empty or filled with
//! a piece kind. Cells live in one flat row-major `Vec` allocated once per
//! board; no gameplay operation reallocates it.
//! Coordinates: (x, y) where x counts columns left to right and y counts rows
//! top to bottom.

use tracing::trace;

use crate::error::{EngineError, Result};
use crate::pieces::Tetromino;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, MAX_BOARD_DIM, PIECE_BOX};

/// The game board using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board.
    ///
    /// Both sides must hold the 4x4 piece box and stay within `MAX_BOARD_DIM`.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        Self::validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        })
    }

    /// Standard 10x20 board.
    pub fn standard() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            cells: vec![None; BOARD_WIDTH as usize * BOARD_HEIGHT as usize],
        }
    }

    pub(crate) fn validate_dimensions(width: u16, height: u16) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(EngineError::Configuration(format!(
                "board dimensions must be positive, got {width}x{height}"
            )));
        }
        if width < PIECE_BOX || height < PIECE_BOX {
            return Err(EngineError::Configuration(format!(
                "board {width}x{height} is smaller than the {PIECE_BOX}x{PIECE_BOX} piece box"
            )));
        }
        if width > MAX_BOARD_DIM || height > MAX_BOARD_DIM {
            return Err(EngineError::Configuration(format!(
                "board {width}x{height} exceeds the {MAX_BOARD_DIM} cell limit"
            )));
        }
        Ok(())
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Check if (x, y) lies inside the grid
    #[inline(always)]
    pub fn in_bounds(&self, x: i16, y: i16) -> bool {
        x >= 0 && y >= 0 && x < self.width as i16 && y < self.height as i16
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty
    pub fn is_empty_at(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// In bounds and filled
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// True iff every cell of the piece is in bounds and empty.
    ///
    /// This is the only collision test; every move, rotation and drop is
    /// "build candidate, ask `can_place`, commit or reject".
    pub fn can_place(&self, piece: &Tetromino) -> bool {
        piece
            .cells()
            .iter()
            .all(|&(x, y)| self.is_empty_at(x, y))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Cells of row `y`, top row is 0
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let width = self.width as usize;
        let start = y * width;
        Some(&self.cells[start..start + width])
    }

    /// Write the piece's cells into the grid, tagged with its kind.
    ///
    /// Nothing is written unless the whole piece fits.
    pub fn lock(&mut self, piece: &Tetromino) -> Result<()> {
        if !self.can_place(piece) {
            return Err(EngineError::InvalidStateTransition {
                reason: "cannot lock a piece that overlaps or leaves the board",
            });
        }

        for (x, y) in piece.cells() {
            self.set(x, y, Some(piece.kind));
        }
        Ok(())
    }

    /// Remove every full row at once and return how many were removed.
    ///
    /// Single bottom-to-top pass with a read and a write cursor: non-full rows
    /// are copied down to the write cursor, full rows are skipped, and the rows
    /// left above the write cursor are emptied. Which full row is seen first
    /// does not matter.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut write_y = height;
        let mut cleared = 0usize;

        for read_y in (0..height).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        self.cells[..write_y * width].fill(None);

        if cleared > 0 {
            trace!(cleared, "cleared full rows");
        }
        cleared
    }

    /// Top-centre anchor for new pieces
    pub fn spawn_anchor(&self) -> (i16, i16) {
        (((self.width - PIECE_BOX) / 2) as i16, 0)
    }

    /// The piece a spawn of `kind` would produce
    pub fn spawn_piece(&self, kind: PieceKind) -> Tetromino {
        let (x, y) = self.spawn_anchor();
        Tetromino::new(kind, x, y)
    }

    /// Check if spawning `kind` is impossible (block out)
    pub fn is_spawn_blocked(&self, kind: PieceKind) -> bool {
        !self.can_place(&self.spawn_piece(kind))
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Encode into an `height x width` grid of piece codes (0 = empty).
    ///
    /// Reuses the rows already in `out` when the shape matches.
    pub fn write_u8_grid(&self, out: &mut Vec<Vec<u8>>) {
        let width = self.width as usize;
        out.resize_with(self.height as usize, Vec::new);
        for (y, row) in out.iter_mut().enumerate() {
            row.clear();
            row.extend(
                self.cells[y * width..(y + 1) * width]
                    .iter()
                    .map(|cell| cell.map(|k| k.code()).unwrap_or(0)),
            );
        }
    }

    /// Build a board from text rows, top row first: `.` is empty, a piece
    /// letter is a locked cell of that kind, anything else is a locked `I`.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let dim = |n: usize, what: &str| {
            u16::try_from(n)
                .ok()
                .filter(|&n| n <= MAX_BOARD_DIM)
                .ok_or_else(|| {
                    EngineError::Configuration(format!(
                        "{what} {n} exceeds the {MAX_BOARD_DIM} cell limit"
                    ))
                })
        };
        let height = dim(rows.len(), "height")?;
        let width = dim(rows.first().map(|r| r.chars().count()).unwrap_or(0), "width")?;
        let mut board = Self::new(width, height)?;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width as usize {
                return Err(EngineError::Configuration(format!(
                    "row {y} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    other => Some(PieceKind::from_str(&other.to_string()).unwrap_or(PieceKind::I)),
                };
                board.set(x as i16, y as i16, cell);
            }
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::standard();
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_board_rejects_bad_dimensions() {
        assert!(matches!(Board::new(0, 20), Err(EngineError::Configuration(_))));
        assert!(matches!(Board::new(10, 0), Err(EngineError::Configuration(_))));
        assert!(matches!(Board::new(3, 20), Err(EngineError::Configuration(_))));
        assert!(matches!(
            Board::new(MAX_BOARD_DIM + 1, 20),
            Err(EngineError::Configuration(_))
        ));
        assert!(Board::new(4, 4).is_ok());
    }

    #[test]
    fn test_from_rows_rejects_oversized_input() {
        // 65_540 rows would wrap to 4 if cast straight to u16.
        let tall = vec!["...."; u16::MAX as usize + 5];
        assert!(matches!(
            Board::from_rows(&tall),
            Err(EngineError::Configuration(_))
        ));

        let wide = ".".repeat(MAX_BOARD_DIM as usize + 1);
        assert!(Board::from_rows(&[wide.as_str(); 4]).is_err());
    }

    #[test]
    fn test_clear_non_adjacent_rows_keeps_order() {
        let mut board = Board::from_rows(&[
            "....", //
            "T...", //
            "IIII", //
            ".S..", //
            "OOOO", //
            "...L", //
        ])
        .unwrap();

        assert_eq!(board.clear_full_rows(), 2);
        let expected = Board::from_rows(&[
            "....", //
            "....", //
            "....", //
            "T...", //
            ".S..", //
            "...L", //
        ])
        .unwrap();
        assert_eq!(board, expected);
    }

    #[test]
    fn test_lock_rejects_overlap_without_writing() {
        let mut board = Board::standard();
        board.set(4, 1, Some(PieceKind::Z));
        let before = board.clone();

        let piece = Tetromino::new(PieceKind::I, 3, 0);
        assert!(board.lock(&piece).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn test_write_u8_grid_codes() {
        let mut board = Board::new(4, 4).unwrap();
        board.set(0, 3, Some(PieceKind::L));
        let mut grid = Vec::new();
        board.write_u8_grid(&mut grid);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[3], vec![7, 0, 0, 0]);
    }

    #[test]
    fn test_spawn_anchor_is_top_centre() {
        assert_eq!(Board::standard().spawn_anchor(), (3, 0));
        assert_eq!(Board::new(4, 8).unwrap().spawn_anchor(), (0, 0));
        assert_eq!(Board::new(12, 8).unwrap().spawn_anchor(), (4, 0));
    }
}
