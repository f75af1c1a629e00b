//! Active falling piece: movement, rotation with wall kicks, drops

use crate::board::Board;
use crate::kicks::kick_offsets;
use crate::tetromino::PieceKind;

/// An active falling piece
#[derive(Debug, Clone)]
pub struct Piece {
    /// The kind of tetromino
    pub kind: PieceKind,
    /// Current rotation state of the canonical matrix
    pub cells: Vec<Vec<bool>>,
    /// Top-left anchor in board coordinates (x = column, y = row).
    /// y may be negative while the piece is still entering the grid.
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Create a piece at the spawn anchor: horizontally centered, top row
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let cells = kind.cells();
        let x = board_width as i32 / 2 - cells[0].len() as i32 / 2;
        Self { kind, cells, x, y: 0 }
    }

    /// Absolute board coordinates of every occupied cell
    pub fn block_positions(&self) -> Vec<(i32, i32)> {
        let mut positions = Vec::with_capacity(4);
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &occupied) in row.iter().enumerate() {
                if occupied {
                    positions.push((self.x + c as i32, self.y + r as i32));
                }
            }
        }
        positions
    }

    /// Try to shift the anchor by (dx, dy); the piece is unchanged on failure
    pub fn move_by(&mut self, dx: i32, dy: i32, board: &Board) -> bool {
        if board.collides(&self.cells, self.x + dx, self.y + dy) {
            false
        } else {
            self.x += dx;
            self.y += dy;
            true
        }
    }

    /// Rotate clockwise, resolving collisions through the wall-kick search.
    /// On failure both shape and anchor keep their pre-rotation values.
    pub fn rotate(&mut self, board: &Board) -> bool {
        // the square is rotation-invariant
        if self.kind == PieceKind::O {
            return true;
        }

        let rotated = rotate_cw(&self.cells);
        for (dx, dy) in kick_offsets(self.kind) {
            if !board.collides(&rotated, self.x + dx, self.y + dy) {
                self.cells = rotated;
                self.x += dx;
                self.y += dy;
                return true;
            }
        }
        false
    }

    /// Drop to the lowest legal position; returns the distance fallen
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.move_by(0, 1, board) {
            distance += 1;
        }
        distance
    }

    /// Row the anchor would come to rest at (for the ghost outline)
    pub fn ghost_y(&self, board: &Board) -> i32 {
        let mut y = self.y;
        while !board.collides(&self.cells, self.x, y + 1) {
            y += 1;
        }
        y
    }
}

/// Clockwise 90 degree turn: new[i][j] = old[rows-1-j][i]
/// (transpose + reverse rows)
fn rotate_cw(cells: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let rows = cells.len();
    let cols = cells[0].len();
    (0..cols)
        .map(|i| (0..rows).map(|j| cells[rows - 1 - j][i]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, DEFAULT_HEIGHT, DEFAULT_WIDTH};

    fn board() -> Board {
        Board::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap()
    }

    #[test]
    fn test_spawn_is_centered() {
        let piece = Piece::spawn(PieceKind::T, DEFAULT_WIDTH);
        assert_eq!(piece.x, 4); // 10/2 - 3/2
        assert_eq!(piece.y, 0);
        let o = Piece::spawn(PieceKind::O, DEFAULT_WIDTH);
        assert_eq!(o.x, 4); // 10/2 - 2/2
    }

    #[test]
    fn test_block_positions_count() {
        for kind in PieceKind::all() {
            let piece = Piece::spawn(kind, DEFAULT_WIDTH);
            assert_eq!(piece.block_positions().len(), 4);
        }
    }

    #[test]
    fn test_move_rejected_at_wall() {
        let board = board();
        let mut piece = Piece::spawn(PieceKind::O, DEFAULT_WIDTH);
        while piece.move_by(-1, 0, &board) {}
        assert_eq!(piece.x, 0);
        let x = piece.x;
        assert!(!piece.move_by(-1, 0, &board));
        assert_eq!(piece.x, x); // unchanged on failure
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        let board = board();
        for kind in PieceKind::all() {
            let mut piece = Piece::spawn(kind, DEFAULT_WIDTH);
            piece.y = 5; // room to rotate freely
            let before = piece.cells.clone();
            for _ in 0..4 {
                assert!(piece.rotate(&board), "{:?}", kind);
            }
            assert_eq!(piece.cells, before, "{:?}", kind);
        }
    }

    #[test]
    fn test_o_rotation_is_noop() {
        let board = board();
        let mut piece = Piece::spawn(PieceKind::O, DEFAULT_WIDTH);
        let (cells, x, y) = (piece.cells.clone(), piece.x, piece.y);
        assert!(piece.rotate(&board));
        assert_eq!(piece.cells, cells);
        assert_eq!((piece.x, piece.y), (x, y));
    }

    #[test]
    fn test_rotate_cw_matrix() {
        // T pointing up rotates clockwise into T pointing right
        let t = PieceKind::T.cells();
        let rotated = rotate_cw(&t);
        let expected: Vec<Vec<bool>> = vec![
            vec![false, true, false],
            vec![false, true, true],
            vec![false, true, false],
        ];
        assert_eq!(rotated, expected);
    }

    #[test]
    fn test_wall_kick_off_left_wall() {
        let board = board();
        // vertical I hugging the left wall: an in-place rotation would poke
        // through the wall, so the kick search must shift it right
        let mut piece = Piece::spawn(PieceKind::I, DEFAULT_WIDTH);
        piece.y = 5;
        assert!(piece.rotate(&board)); // now vertical
        while piece.move_by(-1, 0, &board) {}
        let x_before = piece.x;
        assert!(piece.rotate(&board));
        assert!(piece.x >= x_before);
        assert!(!board.collides(&piece.cells, piece.x, piece.y));
    }

    #[test]
    fn test_rotation_rejected_reverts() {
        let mut board = board();
        // box the T in so no kick can resolve the rotation
        for x in 0..DEFAULT_WIDTH as i32 {
            for y in 0..DEFAULT_HEIGHT as i32 {
                board.set(x, y, Cell::Filled(PieceKind::L));
            }
        }
        let mut piece = Piece::spawn(PieceKind::T, DEFAULT_WIDTH);
        piece.y = 10;
        let (cells, x, y) = (piece.cells.clone(), piece.x, piece.y);
        assert!(!piece.rotate(&board));
        assert_eq!(piece.cells, cells);
        assert_eq!((piece.x, piece.y), (x, y));
    }

    #[test]
    fn test_hard_drop_distance() {
        let board = board();
        let mut piece = Piece::spawn(PieceKind::O, DEFAULT_WIDTH);
        let distance = piece.hard_drop(&board);
        // O occupies rows 0..2 at spawn, so it can fall height-2 rows
        assert_eq!(distance, DEFAULT_HEIGHT as u32 - 2);
        assert!(!piece.move_by(0, 1, &board));
    }

    #[test]
    fn test_ghost_matches_hard_drop() {
        let mut board = board();
        board.set(4, 15, Cell::Filled(PieceKind::J));
        let piece = Piece::spawn(PieceKind::O, DEFAULT_WIDTH);
        let ghost = piece.ghost_y(&board);
        let mut dropped = piece.clone();
        dropped.hard_drop(&board);
        assert_eq!(ghost, dropped.y);
    }
}
