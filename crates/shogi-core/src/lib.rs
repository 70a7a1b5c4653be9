//! Core types for shogi.
//!
//! This crate provides the fundamental types used across the workspace:
//! - [`Owner`] for the two sides
//! - [`PieceType`] and [`Piece`] for piece representation
//! - [`Square`] for board coordinates
//! - [`Hands`] for captured pieces available to drop
//! - [`Move`] and [`Promotion`] for move representation
//! - SFEN parsing and validation, with [`check_piece_counts`] bounding
//!   every placement to one set

mod hands;
mod inventory;
mod mov;
mod owner;
mod piece;
mod sfen;
mod square;

pub use hands::Hands;
pub use inventory::{check_piece_counts, PieceCountError};
pub use mov::{Move, Promotion};
pub use owner::Owner;
pub use piece::{Piece, PieceType};
pub use sfen::{SfenError, SfenParser};
pub use square::Square;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: u8 = 9;
