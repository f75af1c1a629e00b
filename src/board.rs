//! Game board: locked cells, collision detection, and row clearing

use std::fmt;

use crate::piece::Piece;
use crate::tetromino::PieceKind;

/// Standard board dimensions (one classic variant runs 18 rows; both are
/// reachable through settings)
pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled with the kind that locked there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Construction error: boards must have at least one column and one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDimensions {
    pub width: usize,
    pub height: usize,
}

impl fmt::Display for InvalidDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid board dimensions {}x{}", self.width, self.height)
    }
}

impl std::error::Error for InvalidDimensions {}

/// The game board
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    /// Grid stored as rows[row][col], row 0 at the top, rows increase downward
    rows: Vec<Vec<Cell>>,
}

impl Board {
    /// Create a new empty board, failing fast on zero dimensions
    pub fn new(width: usize, height: usize) -> Result<Self, InvalidDimensions> {
        if width == 0 || height == 0 {
            return Err(InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.rows[y][x])
    }

    /// Set the cell at (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return false;
        }
        self.rows[y][x] = cell;
        true
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(Cell::Empty);
        }
    }

    /// The collision predicate shared by movement, rotation, spawn validation
    /// and drop-distance computation. An occupied shape cell collides iff its
    /// column leaves [0, width), its row reaches the floor, or it overlaps a
    /// filled cell. Rows above the top edge never collide, so pieces may
    /// descend into view from outside the grid.
    pub fn collides(&self, shape: &[Vec<bool>], x: i32, y: i32) -> bool {
        for (r, row) in shape.iter().enumerate() {
            for (c, &occupied) in row.iter().enumerate() {
                if !occupied {
                    continue;
                }
                let bx = x + c as i32;
                let by = y + r as i32;
                if bx < 0 || bx >= self.width as i32 || by >= self.height as i32 {
                    return true;
                }
                if by >= 0 && self.rows[by as usize][bx as usize].is_filled() {
                    return true;
                }
            }
        }
        false
    }

    /// Lock a piece's occupied cells into the grid. Cells still above the top
    /// edge are silently discarded.
    pub fn lock(&mut self, piece: &Piece) {
        for (x, y) in piece.block_positions() {
            if y >= 0 {
                self.set(x, y, Cell::Filled(piece.kind));
            }
        }
    }

    /// Check if every cell in a row is filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| cell.is_filled())
    }

    /// Remove every full row, inserting an empty row at the top for each one
    /// removed. Scans bottom-to-top and re-examines the same index after a
    /// removal (the rows above shift into it), so non-contiguous full rows are
    /// all caught in a single pass. Returns the number of rows cleared.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height;
        while y > 0 {
            y -= 1;
            if self.is_row_full(y) {
                self.rows.remove(y);
                self.rows.insert(0, vec![Cell::Empty; self.width]);
                cleared += 1;
                y += 1;
            }
        }
        cleared
    }

    /// Check if the board holds no locked cells
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Iterate rows top to bottom (for rendering)
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| row.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap()
    }

    fn fill_row(board: &mut Board, y: i32) {
        for x in 0..board.width() as i32 {
            board.set(x, y, Cell::Filled(PieceKind::I));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        assert!(board().is_empty());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(Board::new(0, 20).is_err());
        assert!(Board::new(10, 0).is_err());
        assert!(Board::new(0, 0).is_err());
    }

    #[test]
    fn test_set_and_get() {
        let mut board = board();
        assert!(board.set(5, 5, Cell::Filled(PieceKind::T)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(PieceKind::T)));
    }

    #[test]
    fn test_out_of_bounds() {
        let board = board();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(DEFAULT_WIDTH as i32, 0), None);
        assert_eq!(board.get(0, DEFAULT_HEIGHT as i32), None);
    }

    #[test]
    fn test_collides_walls_and_floor() {
        let board = board();
        let shape = vec![vec![true]];
        assert!(board.collides(&shape, -1, 0));
        assert!(board.collides(&shape, DEFAULT_WIDTH as i32, 0));
        assert!(board.collides(&shape, 0, DEFAULT_HEIGHT as i32));
        assert!(!board.collides(&shape, 0, 0));
    }

    #[test]
    fn test_rows_above_top_never_collide() {
        let board = board();
        let shape = vec![vec![true]];
        assert!(!board.collides(&shape, 4, -1));
        assert!(!board.collides(&shape, 4, -3));
    }

    #[test]
    fn test_collides_with_locked_cell() {
        let mut board = board();
        board.set(4, 10, Cell::Filled(PieceKind::O));
        let shape = vec![vec![true]];
        assert!(board.collides(&shape, 4, 10));
        assert!(!board.collides(&shape, 4, 9));
    }

    #[test]
    fn test_clear_single_row() {
        let mut board = board();
        let bottom = DEFAULT_HEIGHT as i32 - 1;
        fill_row(&mut board, bottom);
        // one stray block on the row above
        board.set(0, bottom - 1, Cell::Filled(PieceKind::Z));

        assert_eq!(board.clear_full_rows(), 1);
        // the stray block fell into the bottom row
        assert_eq!(board.get(0, bottom), Some(Cell::Filled(PieceKind::Z)));
        assert!(board.get(0, bottom - 1).unwrap().is_empty());
        assert!(!board.is_row_full(bottom as usize));
    }

    #[test]
    fn test_clear_non_contiguous_rows() {
        let mut board = board();
        fill_row(&mut board, 3);
        fill_row(&mut board, 7);
        // markers on the rows between them
        board.set(2, 5, Cell::Filled(PieceKind::L));
        board.set(6, 6, Cell::Filled(PieceKind::J));

        assert_eq!(board.clear_full_rows(), 2);
        // both markers shifted down by the one full row removed below each
        assert_eq!(board.get(2, 6), Some(Cell::Filled(PieceKind::L)));
        assert_eq!(board.get(6, 7), Some(Cell::Filled(PieceKind::J)));
        for y in 0..DEFAULT_HEIGHT {
            assert!(!board.is_row_full(y));
        }
    }

    #[test]
    fn test_clear_preserves_row_count() {
        let mut board = board();
        fill_row(&mut board, 19);
        fill_row(&mut board, 18);
        board.clear_full_rows();
        assert_eq!(board.rows().count(), DEFAULT_HEIGHT);
    }

    #[test]
    fn test_lock_discards_cells_above_top() {
        let mut board = board();
        let mut piece = Piece::spawn(PieceKind::I, DEFAULT_WIDTH);
        piece.y = -1; // canonical I occupies matrix row 1, so its blocks land on row 0
        board.lock(&piece);
        let filled: usize = board
            .rows()
            .map(|row| row.iter().filter(|c| c.is_filled()).count())
            .sum();
        assert_eq!(filled, 4);

        let mut above = Piece::spawn(PieceKind::O, DEFAULT_WIDTH);
        above.x = 0;
        above.y = -2; // fully above the top edge
        board.lock(&above);
        let filled_after: usize = board
            .rows()
            .map(|row| row.iter().filter(|c| c.is_filled()).count())
            .sum();
        assert_eq!(filled_after, filled);
    }
}
