use shogi_core::{Move, Owner, Piece, PieceCountError, PieceType, Promotion, SfenError, Square};
use shogi_engine::{
    build_legal_moves, is_in_check, legal_drops, legal_moves_for_square, Game, GameError,
    MoveList, Position, RuleSet, StandardShogi, WinReason,
};

fn king_pair() -> Position {
    Position::empty()
        .with_piece(Square::new(0, 8), Piece::new(PieceType::King, Owner::Second))
        .with_piece(Square::new(8, 0), Piece::new(PieceType::King, Owner::First))
}

#[test]
fn double_pawn_drop_is_excluded() {
    let pos = king_pair()
        .with_piece(Square::new(6, 4), Piece::new(PieceType::Pawn, Owner::First))
        .with_hand(Owner::First, PieceType::Pawn, 1);
    let drops = legal_drops(&pos, Owner::First);
    assert!(!drops.is_empty());
    assert!(drops.as_slice().iter().all(|m| m.to().col() != 4));
    assert!(drops.contains(&Move::drop(PieceType::Pawn, Square::new(4, 3))));
}

#[test]
fn promoted_pawn_does_not_block_drops() {
    let pos = king_pair()
        .with_piece(Square::new(3, 4), Piece::promoted(PieceType::Pawn, Owner::First))
        .with_hand(Owner::First, PieceType::Pawn, 1);
    let drops = legal_drops(&pos, Owner::First);
    assert!(drops.contains(&Move::drop(PieceType::Pawn, Square::new(5, 4))));
}

#[test]
fn no_drops_onto_dead_ranks() {
    let pos = king_pair()
        .with_hand(Owner::First, PieceType::Knight, 1)
        .with_hand(Owner::Second, PieceType::Lance, 1);
    let first = legal_drops(&pos, Owner::First);
    assert!(first.as_slice().iter().all(|m| m.to().row() >= 2));
    let second = legal_drops(&pos, Owner::Second);
    assert!(second.as_slice().iter().all(|m| m.to().row() <= 7));
}

#[test]
fn pawn_and_lance_on_last_rank_must_promote() {
    let pos = king_pair()
        .with_piece(Square::new(1, 4), Piece::new(PieceType::Pawn, Owner::First))
        .with_piece(Square::new(4, 2), Piece::new(PieceType::Lance, Owner::First))
        .with_piece(Square::new(7, 6), Piece::new(PieceType::Pawn, Owner::Second));

    for m in legal_moves_for_square(&pos, Square::new(1, 4)).as_slice() {
        assert_eq!(m.promotion(), Promotion::Must);
    }
    let lance = legal_moves_for_square(&pos, Square::new(4, 2));
    for m in lance.as_slice().iter().filter(|m| m.to().row() == 0) {
        assert_eq!(m.promotion(), Promotion::Must);
    }
    // Rows 1 and 2 are in the zone but not forced.
    assert!(lance.contains(&Move::board(Square::new(4, 2), Square::new(1, 2), Promotion::None)));
    assert!(lance.contains(&Move::board(Square::new(4, 2), Square::new(1, 2), Promotion::Must)));

    let pos = pos.with_side_to_move(Owner::Second);
    let pawn = legal_moves_for_square(&pos, Square::new(7, 6));
    assert_eq!(pawn.as_slice(), &[Move::board(Square::new(7, 6), Square::new(8, 6), Promotion::Must)]);
}

#[test]
fn knight_on_last_two_ranks_must_promote() {
    let pos = king_pair().with_piece(Square::new(3, 4), Piece::new(PieceType::Knight, Owner::First));
    let moves = legal_moves_for_square(&pos, Square::new(3, 4));
    assert_eq!(moves.len(), 2);
    assert!(moves.as_slice().iter().all(|m| m.promotion() == Promotion::Must));

    let pos = king_pair().with_piece(Square::new(4, 4), Piece::new(PieceType::Knight, Owner::First));
    let moves = legal_moves_for_square(&pos, Square::new(4, 4));
    // Landing on row 2: optional, so both variants.
    assert_eq!(moves.len(), 4);
}

#[test]
fn no_optional_moves_in_legal_lists() {
    let pos = Position::from_sfen("lnsgkgsnl/1r5b1/pppppp1pp/6p2/9/2P6/PP1PPPPPP/1B5R1/LNSGKGSNL b - 1")
        .unwrap();
    let moves = build_legal_moves(&pos, Owner::First);
    assert!(moves
        .as_slice()
        .iter()
        .all(|m| m.promotion() != Promotion::Optional));
    assert!(moves.contains(&Move::from_usi("8h2b+").unwrap()));
    assert!(moves.contains(&Move::from_usi("8h2b").unwrap()));
}

#[test]
fn pinned_piece_cannot_leave_the_line() {
    let pos = king_pair()
        .with_piece(Square::new(8, 4), Piece::new(PieceType::Rook, Owner::Second))
        .with_piece(Square::new(8, 2), Piece::new(PieceType::Gold, Owner::First));
    let gold = legal_moves_for_square(&pos, Square::new(8, 2));
    assert!(gold.as_slice().iter().all(|m| m.to().row() == 8));
}

#[test]
fn usi_move_mapping() {
    let m = Move::from_usi("7g7f").unwrap();
    assert_eq!(m, Move::board(Square::new(6, 2), Square::new(5, 2), Promotion::None));
    let d = Move::from_usi("P*5e").unwrap();
    assert_eq!(d, Move::drop(PieceType::Pawn, Square::new(4, 4)));
    assert_eq!(Move::from_usi("resign"), None);
    assert_eq!(Move::from_usi("win"), None);
    assert_eq!(Move::from_usi("none"), None);
}

#[test]
fn game_rejects_moves_after_the_end() {
    let mut game = Game::from_sfen("4k4/9/4P4/9/9/9/9/9/4K4 b G 1").unwrap();
    game.make_move_usi("G*5b").unwrap();
    let result = game.result().unwrap();
    assert_eq!(result.winner, Owner::First);
    assert_eq!(result.reason, WinReason::Checkmate);
    assert!(matches!(game.make_move_usi("5a4a"), Err(GameError::GameAlreadyOver)));

    game.undo().unwrap();
    assert!(!game.is_game_over());
    assert!(matches!(game.make_move_usi("5i5g"), Err(GameError::IllegalMove(_))));
}

#[test]
fn seven_ply_mate_from_the_start() {
    let mut game = Game::new();
    for usi in ["7g7f", "3c3d", "8h2b+", "4a5b", "B*4b", "5a4a", "2b3a"] {
        game.make_move_usi(usi).unwrap();
    }
    let pos = game.position();
    assert_eq!(pos.side_to_move, Owner::Second);
    assert!(is_in_check(&pos.board, Owner::Second));
    assert!(build_legal_moves(pos, Owner::Second).is_empty());
    assert_eq!(
        game.result().map(|r| (r.winner, r.reason)),
        Some((Owner::First, WinReason::Checkmate))
    );
}

#[test]
fn rule_set_agrees_with_free_functions() {
    let rules = StandardShogi;
    let pos = rules.initial_position();
    assert_eq!(rules.generate_moves(&pos).len(), build_legal_moves(&pos, Owner::First).len());
    assert!(!rules.is_check(&pos));
    assert!(!is_in_check(&pos.board, Owner::Second));
    assert_eq!(rules.game_result(&pos), None);
}

const FIVE_ROOKS_FIVE_BISHOPS: &str = "R4B3/2R4B1/1B2R4/3B2R2/5B2R/9/9/9/K7k b RBGSNLP 1";

#[test]
fn overfull_sfen_is_rejected() {
    assert!(matches!(
        Position::from_sfen(FIVE_ROOKS_FIVE_BISHOPS),
        Err(SfenError::PieceCount(PieceCountError::TooMany {
            kind: PieceType::Bishop,
            ..
        }))
    ));
    assert!(Game::from_sfen(FIVE_ROOKS_FIVE_BISHOPS).is_err());
}

#[test]
fn move_generation_caps_an_overfull_position() {
    // The same rooks and bishops, placed by hand where the parser would refuse them.
    let mut pos = king_pair();
    for (row, rook, bishop) in [(0, 0, 5), (1, 2, 7), (2, 4, 1), (3, 6, 3), (4, 8, 5)] {
        pos = pos
            .with_piece(Square::new(row, rook), Piece::new(PieceType::Rook, Owner::First))
            .with_piece(Square::new(row, bishop), Piece::new(PieceType::Bishop, Owner::First));
    }
    for kind in PieceType::HAND {
        pos = pos.with_hand(Owner::First, kind, 1);
    }
    let moves = build_legal_moves(&pos, Owner::First);
    assert_eq!(moves.len(), MoveList::MAX_MOVES);
    assert!(StandardShogi.generate_moves(&pos).len() <= MoveList::MAX_MOVES);
}
