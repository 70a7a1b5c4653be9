//! The 9x9 board grid.

use serde::{Deserialize, Serialize};
use shogi_core::{Owner, Piece, PieceType, Square, BOARD_SIZE};
use std::fmt;

/// Wire form of a board: nine rows of nine optional pieces.
type Rows = [[Option<Piece>; 9]; 9];

/// A 9x9 grid of optional pieces, indexed by [`Square`].
///
/// At most one piece occupies a square. A side may have its King missing,
/// which marks a finished game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Rows", into = "Rows")]
pub struct Board {
    cells: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Board {
            cells: [None; Square::COUNT],
        }
    }

    /// Creates a board from a row-major grid.
    pub fn from_rows(rows: &Rows) -> Self {
        let mut board = Board::empty();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                board.cells[r * BOARD_SIZE as usize + c] = *cell;
            }
        }
        board
    }

    /// Returns the board as a row-major grid.
    pub fn to_rows(&self) -> Rows {
        let mut rows = [[None; 9]; 9];
        for sq in Square::all() {
            rows[sq.row() as usize][sq.col() as usize] = self.get(sq);
        }
        rows
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub const fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    /// Places `piece` on `sq` (or clears it with `None`).
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.index()] = piece;
    }

    /// Returns true if `sq` is empty.
    #[inline]
    pub const fn is_empty_at(&self, sq: Square) -> bool {
        self.cells[sq.index()].is_none()
    }

    /// Iterates over occupied squares and their pieces.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Iterates over the squares and pieces owned by `owner`.
    pub fn pieces_of(&self, owner: Owner) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.owner == owner)
    }

    /// Returns the square of `owner`'s King, or `None` if it is gone.
    pub fn king_square(&self, owner: Owner) -> Option<Square> {
        self.pieces_of(owner)
            .find(|(_, p)| p.kind == PieceType::King)
            .map(|(sq, _)| sq)
    }

    /// Returns true if `owner` has an unpromoted Pawn on column `col`.
    pub fn has_unpromoted_pawn_on_col(&self, owner: Owner, col: u8) -> bool {
        (0..BOARD_SIZE).any(|row| {
            matches!(
                self.get(Square::new(row, col)),
                Some(Piece { kind: PieceType::Pawn, owner: o, promoted: false }) if o == owner
            )
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Rows> for Board {
    fn from(rows: Rows) -> Self {
        Board::from_rows(&rows)
    }
}

impl From<Board> for Rows {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\n{})", self)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  9  8  7  6  5  4  3  2  1")?;
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                match self.get(Square::new(row, col)) {
                    Some(p) => write!(f, "{:>3}", p.to_sfen())?,
                    None => write!(f, "  .")?,
                }
            }
            writeln!(f, "  {}", (b'a' + row) as char)?;
        }
        Ok(())
    }
}
