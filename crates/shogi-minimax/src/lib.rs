//! Local shogi search.
//!
//! [`evaluate`] scores a position statically (positive favors the second
//! side) and [`Searcher`] runs alpha-beta minimax under iterative deepening
//! with a wall-clock budget.
//!
//! ```
//! use shogi_engine::Position;
//! use shogi_minimax::{SearchConfig, Searcher};
//! use std::time::Duration;
//!
//! let pos = Position::from_sfen("4k4/9/4P4/9/9/9/9/9/4K4 b G 1").unwrap();
//! let mut searcher = Searcher::with_seed(SearchConfig::with_limits(2, Duration::from_secs(10)), 0);
//! assert_eq!(searcher.choose_move(&pos).unwrap().to_usi(), "G*5b");
//! ```

pub mod eval;
pub mod search;

pub use eval::{evaluate, piece_square, sum_material, EvalWeights, PieceWeights};
pub use search::{
    choose_move, gives_check, order_moves, SearchConfig, SearchInfo, Searcher, MATE_SCORE,
};
