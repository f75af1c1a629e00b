//! Wall-kick offset tables
//!
//! When a rotated shape collides at the unchanged anchor, these (dx, dy)
//! offsets are tried in order and the first legal placement wins. The fixed
//! ordering biases toward minimal visual displacement; there is deliberately
//! no exhaustive search.

use crate::tetromino::PieceKind;

/// Offsets tried for every kind. Negative dy is upward.
const BASE_KICKS: [(i32, i32); 9] = [
    (0, 0),
    (-1, 0),
    (1, 0),
    (0, -1),
    (-1, -1),
    (1, -1),
    (-2, 0),
    (2, 0),
    (0, -2),
];

/// Extra offsets for the I kind, whose long side needs wider escapes near
/// walls and corners.
const I_KICKS: [(i32, i32); 4] = [(-2, -1), (2, -1), (-1, -2), (1, -2)];

/// Kick offsets for a kind, in search order
pub fn kick_offsets(kind: PieceKind) -> impl Iterator<Item = (i32, i32)> {
    let extra: &'static [(i32, i32)] = match kind {
        PieceKind::I => &I_KICKS,
        _ => &[],
    };
    BASE_KICKS.iter().chain(extra.iter()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_offset_is_identity() {
        for kind in PieceKind::all() {
            assert_eq!(kick_offsets(kind).next(), Some((0, 0)));
        }
    }

    #[test]
    fn test_i_gets_extended_list() {
        assert_eq!(kick_offsets(PieceKind::I).count(), 13);
        assert_eq!(kick_offsets(PieceKind::T).count(), 9);
    }

    #[test]
    fn test_no_downward_kicks() {
        // kicks only resolve placements sideways or upward
        for kind in PieceKind::all() {
            assert!(kick_offsets(kind).all(|(_, dy)| dy <= 0));
        }
    }
}
