//! Tetromino definitions and shapes
//!
//! The seven kinds, each as a canonical occupancy matrix in its spawn
//! orientation. Rotation states are derived by transforming the matrix, not
//! looked up per kind.

use ratatui::style::Color;

/// The 7 tetromino kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
    J, // Blue - J-shape
    L, // Orange - L-shape
}

impl PieceKind {
    /// Display color for this kind (the engine treats the kind as an opaque
    /// id; only rendering consults this)
    pub fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::Cyan,
            PieceKind::O => Color::Yellow,
            PieceKind::T => Color::Magenta,
            PieceKind::S => Color::Green,
            PieceKind::Z => Color::Red,
            PieceKind::J => Color::Blue,
            PieceKind::L => Color::Rgb(255, 165, 0), // Orange
        }
    }

    /// All kinds, for the spawner
    pub fn all() -> [PieceKind; 7] {
        [
            PieceKind::I,
            PieceKind::O,
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
            PieceKind::J,
            PieceKind::L,
        ]
    }

    /// Canonical occupancy matrix in spawn orientation. I sits in a 4x4 and O
    /// in a 2x2; the rest use 3x3 so their rotation pivot stays put.
    pub fn cells(&self) -> Vec<Vec<bool>> {
        let pattern: &[&[u8]] = match self {
            PieceKind::I => &[
                &[0, 0, 0, 0],
                &[1, 1, 1, 1],
                &[0, 0, 0, 0],
                &[0, 0, 0, 0],
            ],
            PieceKind::O => &[
                &[1, 1],
                &[1, 1],
            ],
            PieceKind::T => &[
                &[0, 1, 0],
                &[1, 1, 1],
                &[0, 0, 0],
            ],
            PieceKind::S => &[
                &[0, 1, 1],
                &[1, 1, 0],
                &[0, 0, 0],
            ],
            PieceKind::Z => &[
                &[1, 1, 0],
                &[0, 1, 1],
                &[0, 0, 0],
            ],
            PieceKind::J => &[
                &[1, 0, 0],
                &[1, 1, 1],
                &[0, 0, 0],
            ],
            PieceKind::L => &[
                &[0, 0, 1],
                &[1, 1, 1],
                &[0, 0, 0],
            ],
        };
        pattern
            .iter()
            .map(|row| row.iter().map(|&v| v != 0).collect())
            .collect()
    }
}
