//! Rule set abstraction.
//!
//! This module provides the [`RuleSet`] trait through which search and the
//! engine bridge query the rules, plus the legality filter that turns
//! pseudo-legal moves into concrete legal ones.

mod standard;

pub use standard::{
    build_legal_moves, is_move_legal, leaves_king_safe, legal_drops, legal_moves_for_square,
    promotion_legality, StandardShogi,
};

use crate::{MoveList, Position};
use shogi_core::{Move, Owner, Promotion};

/// How a finished game ended, and for whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Owner,
    pub reason: WinReason,
}

/// Reason a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinReason {
    /// The loser's King is no longer on the board.
    KingCaptured,
    /// The side to move is in check and has no legal moves.
    Checkmate,
    /// The side to move has no legal moves without being in check.
    NoLegalMoves,
}

/// Which variants of an optional-promotion move are legal.
///
/// A move that may promote is tested twice, once promoting and once not,
/// since the two can differ in whether they leave the King attacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionLegality {
    /// Both promoting and staying are legal.
    Both,
    /// Only the promoting variant is legal.
    PromoteOnly,
    /// Only the non-promoting variant is legal.
    StayOnly,
    /// Neither variant is legal.
    Neither,
}

impl PromotionLegality {
    /// Builds the tri-state from the legality of each variant.
    pub const fn from_flags(promote: bool, stay: bool) -> Self {
        match (promote, stay) {
            (true, true) => PromotionLegality::Both,
            (true, false) => PromotionLegality::PromoteOnly,
            (false, true) => PromotionLegality::StayOnly,
            (false, false) => PromotionLegality::Neither,
        }
    }

    /// Returns true if at least one variant is legal.
    pub const fn any(self) -> bool {
        !matches!(self, PromotionLegality::Neither)
    }

    /// Returns the legal concrete variants of `m`, promoting first.
    pub fn variants(self, m: Move) -> impl Iterator<Item = Move> {
        let promote = matches!(self, PromotionLegality::Both | PromotionLegality::PromoteOnly)
            .then(|| m.with_promotion(Promotion::Must));
        let stay = matches!(self, PromotionLegality::Both | PromotionLegality::StayOnly)
            .then(|| m.with_promotion(Promotion::None));
        promote.into_iter().chain(stay)
    }
}

/// The rules as seen by search, the game container and the bridge.
///
/// # Example
///
/// ```
/// use shogi_engine::StandardShogi;
/// use shogi_engine::rules::RuleSet;
///
/// let position = StandardShogi.initial_position();
/// let moves = StandardShogi.generate_moves(&position);
/// assert!(!moves.is_empty());
/// ```
pub trait RuleSet {
    fn initial_position(&self) -> Position;

    /// Concrete legal moves for the side to move, promotions expanded.
    fn generate_moves(&self, position: &Position) -> MoveList;

    fn is_legal(&self, position: &Position, m: Move) -> bool;

    /// Applies `m` without checking it. Untrusted moves go through
    /// [`try_make_move`](RuleSet::try_make_move).
    fn make_move(&self, position: &Position, m: Move) -> Position;

    fn try_make_move(&self, position: &Position, m: Move) -> Option<Position> {
        self.is_legal(position, m).then(|| self.make_move(position, m))
    }

    fn is_check(&self, position: &Position) -> bool;

    /// `None` while the side to move still has a legal move and a King.
    fn game_result(&self, position: &Position) -> Option<GameResult>;

    fn is_game_over(&self, position: &Position) -> bool {
        self.game_result(position).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shogi_core::Square;

    #[test]
    fn tri_state_flags() {
        assert_eq!(PromotionLegality::from_flags(true, true), PromotionLegality::Both);
        assert_eq!(
            PromotionLegality::from_flags(true, false),
            PromotionLegality::PromoteOnly
        );
        assert_eq!(
            PromotionLegality::from_flags(false, true),
            PromotionLegality::StayOnly
        );
        assert!(!PromotionLegality::from_flags(false, false).any());
    }

    #[test]
    fn variants_expand_in_order() {
        let m = Move::board(Square::new(3, 3), Square::new(2, 3), Promotion::Optional);
        let both: Vec<_> = PromotionLegality::Both.variants(m).collect();
        assert_eq!(
            both,
            vec![
                m.with_promotion(Promotion::Must),
                m.with_promotion(Promotion::None)
            ]
        );
        assert_eq!(PromotionLegality::StayOnly.variants(m).count(), 1);
        assert_eq!(PromotionLegality::Neither.variants(m).count(), 0);
    }
}
