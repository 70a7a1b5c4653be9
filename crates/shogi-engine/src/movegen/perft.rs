//! Leaf counts of the legal move tree, for checking the generator against
//! known totals.

use crate::rules::build_legal_moves;
use crate::Position;

/// Leaves of the legal move tree `depth` plies deep. A promoting and a
/// non-promoting variant are separate leaves.
pub fn perft(position: &Position, depth: u32) -> u64 {
    let moves = build_legal_moves(position, position.side_to_move);
    match depth {
        0 => 1,
        1 => moves.len() as u64,
        _ => moves
            .iter()
            .map(|m| perft(&position.apply_move(*m), depth - 1))
            .sum(),
    }
}

/// Per root move subtotals, sorted by USI string.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut split: Vec<(String, u64)> = build_legal_moves(position, position.side_to_move)
        .iter()
        .map(|m| {
            let below = perft(&position.apply_move(*m), depth.saturating_sub(1));
            (m.to_usi(), below)
        })
        .collect();
    split.sort_unstable();
    split
}
