//! Attack and check detection.

use super::visit_destinations;
use crate::Board;
use shogi_core::{Owner, Square};
use std::ops::ControlFlow;

/// Returns true if any piece owned by `attacker` can move to `target`.
pub fn is_square_attacked(board: &Board, target: Square, attacker: Owner) -> bool {
    board.pieces_of(attacker).any(|(from, piece)| {
        visit_destinations(board, from, piece, |to| {
            if to == target {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .is_break()
    })
}

/// Returns true if `owner`'s King is attacked.
///
/// A missing King also counts as check, so positions after a King capture
/// are never mistaken for safe ones.
pub fn is_in_check(board: &Board, owner: Owner) -> bool {
    match board.king_square(owner) {
        Some(king) => is_square_attacked(board, king, owner.opposite()),
        None => true,
    }
}
