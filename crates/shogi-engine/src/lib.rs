//! Shogi rules engine.
//!
//! This crate provides:
//! - [`Board`] - 9x9 grid of optional pieces
//! - [`Position`] - board, hands and side to move as an immutable snapshot
//! - [`Game`] - game management with move history
//! - [`RuleSet`] - trait the search and bridge use to query the rules
//! - Pseudo-move and drop generation, check detection, and the legality filter
//!
//! # Example
//!
//! ```
//! use shogi_engine::{Game, StandardShogi};
//! use shogi_engine::rules::RuleSet;
//!
//! let position = StandardShogi.initial_position();
//! let moves = StandardShogi.generate_moves(&position);
//! assert_eq!(moves.len(), 30);
//!
//! let mut game = Game::new();
//! game.make_move_usi("7g7f").unwrap();
//! game.make_move_usi("3c3d").unwrap();
//! println!("{}", game.to_sfen());
//! ```

mod board;
mod game;
pub mod movegen;
mod position;
pub mod rules;

pub use board::Board;
pub use game::{Game, GameError, GameMove};
pub use movegen::{
    count_pseudo_moves, is_in_check, is_square_attacked, movement, pseudo_drops, pseudo_moves,
    Movement, MoveList,
};
pub use position::Position;
pub use rules::{
    build_legal_moves, is_move_legal, legal_drops, legal_moves_for_square, promotion_legality,
    GameResult, PromotionLegality, RuleSet, StandardShogi, WinReason,
};
