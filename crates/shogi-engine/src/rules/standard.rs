//! Standard shogi rules and the legality filter.

use super::{GameResult, PromotionLegality, RuleSet, WinReason};
use crate::movegen::{is_in_check, pseudo_drops, pseudo_moves};
use crate::{MoveList, Position};
use shogi_core::{Move, Owner, Promotion, Square};

/// Standard shogi rules.
///
/// - Standard piece movement and promotion zones
/// - Drops with the double-pawn and dead-piece restrictions
/// - Self-check filtering
/// - King capture, checkmate, and no-legal-move endings
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardShogi;

impl RuleSet for StandardShogi {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn generate_moves(&self, position: &Position) -> MoveList {
        build_legal_moves(position, position.side_to_move)
    }

    fn is_legal(&self, position: &Position, m: Move) -> bool {
        m.promotion() != Promotion::Optional && self.generate_moves(position).contains(&m)
    }

    fn make_move(&self, position: &Position, m: Move) -> Position {
        position.apply_move(m)
    }

    fn is_check(&self, position: &Position) -> bool {
        is_in_check(&position.board, position.side_to_move)
    }

    fn game_result(&self, position: &Position) -> Option<GameResult> {
        for owner in Owner::ALL {
            if position.board.king_square(owner).is_none() {
                return Some(GameResult {
                    winner: owner.opposite(),
                    reason: WinReason::KingCaptured,
                });
            }
        }

        let side = position.side_to_move;
        if !build_legal_moves(position, side).is_empty() {
            return None;
        }
        let reason = if is_in_check(&position.board, side) {
            WinReason::Checkmate
        } else {
            WinReason::NoLegalMoves
        };
        Some(GameResult {
            winner: side.opposite(),
            reason,
        })
    }
}

/// Returns true if `mover` playing `m` does not leave their own King attacked.
pub fn leaves_king_safe(position: &Position, mover: Owner, m: Move) -> bool {
    let next = position.apply_move_for(mover, m);
    !is_in_check(&next.board, mover)
}

/// The side that would play `m`: the owner of the moving piece, or the side
/// to move for drops.
fn mover_of(position: &Position, m: Move) -> Option<Owner> {
    match m.from() {
        Some(from) => position.board.get(from).map(|p| p.owner),
        None => Some(position.side_to_move),
    }
}

/// Evaluates which concrete variants of `m` are legal.
///
/// An `Optional` move is tested both promoting and staying. A move with a
/// fixed tag yields `PromoteOnly`/`StayOnly` when legal and `Neither`
/// otherwise. The move is assumed to be pseudo-legal.
pub fn promotion_legality(position: &Position, m: Move) -> PromotionLegality {
    let Some(mover) = mover_of(position, m) else {
        return PromotionLegality::Neither;
    };
    let safe = |promotion| leaves_king_safe(position, mover, m.with_promotion(promotion));
    match m.promotion() {
        Promotion::Optional => {
            PromotionLegality::from_flags(safe(Promotion::Must), safe(Promotion::None))
        }
        Promotion::Must => PromotionLegality::from_flags(safe(Promotion::Must), false),
        Promotion::None => PromotionLegality::from_flags(false, safe(Promotion::None)),
    }
}

/// Returns true if at least one variant of the pseudo-legal move `m` is legal.
pub fn is_move_legal(position: &Position, m: Move) -> bool {
    promotion_legality(position, m).any()
}

fn push_legal_variants(position: &Position, m: Move, out: &mut MoveList) {
    out.extend(promotion_legality(position, m).variants(m));
}

/// Returns the concrete legal moves of the piece on `from`.
///
/// Optional promotions are expanded into their legal variants.
pub fn legal_moves_for_square(position: &Position, from: Square) -> MoveList {
    let mut legal = MoveList::new();
    for m in &pseudo_moves(&position.board, from) {
        push_legal_variants(position, *m, &mut legal);
    }
    legal
}

/// Returns the legal drops for `owner`.
pub fn legal_drops(position: &Position, owner: Owner) -> MoveList {
    let mut drops = pseudo_drops(&position.board, &position.hands, owner);
    drops.retain(|m| leaves_king_safe(position, owner, *m));
    drops
}

/// Returns every concrete legal move for `owner`: board moves first, then drops.
pub fn build_legal_moves(position: &Position, owner: Owner) -> MoveList {
    let mut legal = MoveList::new();
    for (from, _) in position.board.pieces_of(owner) {
        for m in &pseudo_moves(&position.board, from) {
            push_legal_variants(position, *m, &mut legal);
        }
    }
    for m in &legal_drops(position, owner) {
        legal.push(*m);
    }
    legal
}

#[cfg(test)]
mod tests {
    use super::*;
    use shogi_core::{Piece, PieceType};

    fn king(owner: Owner) -> Piece {
        Piece::new(PieceType::King, owner)
    }

    #[test]
    fn startpos_has_30_moves() {
        let pos = Position::startpos();
        assert_eq!(StandardShogi.generate_moves(&pos).len(), 30);
        assert!(StandardShogi.game_result(&pos).is_none());
    }

    #[test]
    fn pinned_piece_cannot_move_off_line() {
        // First-side gold on (7,4) pinned by a second-side rook on (0,4).
        let pos = Position::empty()
            .with_piece(Square::new(8, 4), king(Owner::First))
            .with_piece(Square::new(7, 4), Piece::new(PieceType::Gold, Owner::First))
            .with_piece(Square::new(0, 4), Piece::new(PieceType::Rook, Owner::Second))
            .with_piece(Square::new(0, 0), king(Owner::Second));
        let moves = legal_moves_for_square(&pos, Square::new(7, 4));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to(), Square::new(6, 4));
    }

    #[test]
    fn optional_promotion_expands_to_both() {
        let pos = Position::empty()
            .with_piece(Square::new(8, 8), king(Owner::First))
            .with_piece(Square::new(0, 0), king(Owner::Second))
            .with_piece(Square::new(3, 4), Piece::new(PieceType::Silver, Owner::First));
        let m = Move::board(Square::new(3, 4), Square::new(2, 4), Promotion::Optional);
        assert_eq!(promotion_legality(&pos, m), PromotionLegality::Both);
        let moves = legal_moves_for_square(&pos, Square::new(3, 4));
        let to_2_4: Vec<_> = moves
            .as_slice()
            .iter()
            .filter(|m| m.to() == Square::new(2, 4))
            .map(|m| m.promotion())
            .collect();
        assert_eq!(to_2_4, vec![Promotion::Must, Promotion::None]);
        assert!(moves.as_slice().iter().all(|m| m.promotion() != Promotion::Optional));
    }

    #[test]
    fn pinned_optional_move_is_neither() {
        // The silver on (7,4) shields its king from the lance on (3,4).
        let pos = Position::empty()
            .with_piece(Square::new(8, 4), king(Owner::First))
            .with_piece(Square::new(0, 0), king(Owner::Second))
            .with_piece(Square::new(3, 4), Piece::new(PieceType::Lance, Owner::Second))
            .with_piece(Square::new(7, 4), Piece::new(PieceType::Silver, Owner::First))
            .with_piece(Square::new(3, 3), Piece::new(PieceType::Silver, Owner::First));
        let pinned = Move::board(Square::new(7, 4), Square::new(6, 3), Promotion::None);
        assert_eq!(promotion_legality(&pos, pinned), PromotionLegality::Neither);

        let free = Move::board(Square::new(3, 3), Square::new(2, 3), Promotion::Optional);
        assert_eq!(promotion_legality(&pos, free), PromotionLegality::Both);
    }

    #[test]
    fn must_move_reports_promote_only() {
        let pos = Position::empty()
            .with_piece(Square::new(8, 8), king(Owner::First))
            .with_piece(Square::new(0, 0), king(Owner::Second))
            .with_piece(Square::new(1, 4), Piece::new(PieceType::Pawn, Owner::First));
        let m = Move::board(Square::new(1, 4), Square::new(0, 4), Promotion::Must);
        assert_eq!(promotion_legality(&pos, m), PromotionLegality::PromoteOnly);
        assert!(is_move_legal(&pos, m));
    }

    #[test]
    fn moving_into_check_is_illegal() {
        let pos = Position::empty()
            .with_piece(Square::new(8, 4), king(Owner::First))
            .with_piece(Square::new(6, 3), Piece::new(PieceType::Rook, Owner::Second))
            .with_piece(Square::new(0, 0), king(Owner::Second));
        // (7,3) is on the rook's file.
        let m = Move::normal(Square::new(8, 4), Square::new(7, 3));
        assert_eq!(promotion_legality(&pos, m), PromotionLegality::Neither);
        let dests: Vec<_> = legal_moves_for_square(&pos, Square::new(8, 4))
            .as_slice()
            .iter()
            .map(|m| m.to())
            .collect();
        assert!(!dests.contains(&Square::new(7, 3)));
        assert!(dests.contains(&Square::new(7, 5)));
    }

    #[test]
    fn drop_must_block_check() {
        let pos = Position::empty()
            .with_piece(Square::new(8, 4), king(Owner::First))
            .with_piece(Square::new(4, 4), Piece::new(PieceType::Lance, Owner::Second))
            .with_piece(Square::new(0, 0), king(Owner::Second))
            .with_hand(Owner::First, PieceType::Gold, 1);
        let drops = legal_drops(&pos, Owner::First);
        let squares: Vec<_> = drops.as_slice().iter().map(|m| m.to()).collect();
        assert_eq!(
            squares,
            vec![Square::new(5, 4), Square::new(6, 4), Square::new(7, 4)]
        );
    }

    #[test]
    fn king_capture_ends_the_game() {
        let pos = Position::empty().with_piece(Square::new(8, 4), king(Owner::First));
        assert_eq!(
            StandardShogi.game_result(&pos),
            Some(GameResult {
                winner: Owner::First,
                reason: WinReason::KingCaptured,
            })
        );
    }

    #[test]
    fn no_legal_moves_without_check_loses() {
        // The second-side king in the corner is boxed in by first-side golds
        // that cover every flight square without attacking the king itself.
        let pos = Position::from_sfen("k8/2G6/1G7/9/9/9/9/9/8K w - 1").unwrap();
        assert!(!StandardShogi.is_check(&pos));
        assert!(StandardShogi.generate_moves(&pos).is_empty());
        assert_eq!(
            StandardShogi.game_result(&pos),
            Some(GameResult {
                winner: Owner::First,
                reason: WinReason::NoLegalMoves,
            })
        );
    }

    #[test]
    fn is_legal_rejects_unresolved_optional() {
        let pos = Position::empty()
            .with_piece(Square::new(8, 8), king(Owner::First))
            .with_piece(Square::new(0, 0), king(Owner::Second))
            .with_piece(Square::new(3, 4), Piece::new(PieceType::Silver, Owner::First));
        let m = Move::board(Square::new(3, 4), Square::new(2, 4), Promotion::Optional);
        assert!(!StandardShogi.is_legal(&pos, m));
        assert!(StandardShogi.is_legal(&pos, m.with_promotion(Promotion::Must)));
        assert!(StandardShogi.try_make_move(&pos, m).is_none());
    }
}
