//! Piece counts of a single shogi set.

use crate::{Hands, Owner, Piece, PieceType};
use thiserror::Error;

/// A placement that holds more pieces than one set contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PieceCountError {
    #[error("{count} pieces of type {kind}, a set has {max}")]
    TooMany { kind: PieceType, count: u32, max: u32 },
    #[error("{count} kings for side {owner}")]
    ExtraKing { owner: Owner, count: u32 },
}

/// Checks that `pieces` on the board together with both hands fit in one
/// set: at most one King a side, and every other type within
/// [`PieceType::set_size`]. Promoted pieces count as their base type.
pub fn check_piece_counts(
    pieces: impl IntoIterator<Item = Piece>,
    hands: &Hands,
) -> Result<(), PieceCountError> {
    let mut totals = [0u32; PieceType::ALL.len()];
    let mut kings = [0u32; 2];
    for piece in pieces {
        totals[piece.kind.index()] += 1;
        if piece.kind == PieceType::King {
            kings[piece.owner.index()] += 1;
        }
    }
    for owner in Owner::ALL {
        let count = kings[owner.index()];
        if count > 1 {
            return Err(PieceCountError::ExtraKing { owner, count });
        }
        for (kind, n) in hands.held(owner) {
            totals[kind.index()] = totals[kind.index()].saturating_add(n);
        }
    }
    for kind in PieceType::ALL {
        let (count, max) = (totals[kind.index()], kind.set_size());
        if count > max {
            return Err(PieceCountError::TooMany { kind, count, max });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_set_fits() {
        let mut hands = Hands::empty();
        for kind in PieceType::HAND {
            hands.set(Owner::First, kind, kind.set_size());
        }
        let kings = [
            Piece::new(PieceType::King, Owner::First),
            Piece::new(PieceType::King, Owner::Second),
        ];
        assert_eq!(check_piece_counts(kings, &hands), Ok(()));
    }

    #[test]
    fn board_and_hand_are_summed() {
        let mut hands = Hands::empty();
        hands.set(Owner::Second, PieceType::Rook, 1);
        let board = [
            Piece::promoted(PieceType::Rook, Owner::First),
            Piece::new(PieceType::Rook, Owner::Second),
        ];
        assert_eq!(
            check_piece_counts(board, &hands),
            Err(PieceCountError::TooMany {
                kind: PieceType::Rook,
                count: 3,
                max: 2
            })
        );
    }

    #[test]
    fn second_king_is_rejected() {
        let board = [Piece::new(PieceType::King, Owner::First); 2];
        assert_eq!(
            check_piece_counts(board, &Hands::empty()),
            Err(PieceCountError::ExtraKing {
                owner: Owner::First,
                count: 2
            })
        );
    }

    #[test]
    fn nineteen_pawns_in_hand() {
        let mut hands = Hands::empty();
        hands.set(Owner::Second, PieceType::Pawn, 19);
        assert!(matches!(
            check_piece_counts(std::iter::empty(), &hands),
            Err(PieceCountError::TooMany {
                kind: PieceType::Pawn,
                ..
            })
        ));
    }
}
