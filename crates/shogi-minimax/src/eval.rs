//! Static evaluation.
//!
//! Scores are signed: positive favors the second side, negative the first.

use serde::{Deserialize, Serialize};
use shogi_core::{Owner, PieceType, Square};
use shogi_engine::{count_pseudo_moves, is_in_check, Position};

/// One weight per piece type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceWeights {
    pub pawn: f64,
    pub lance: f64,
    pub knight: f64,
    pub silver: f64,
    pub gold: f64,
    pub bishop: f64,
    pub rook: f64,
    pub king: f64,
}

impl PieceWeights {
    /// Returns the weight for `kind`.
    #[inline]
    pub const fn get(&self, kind: PieceType) -> f64 {
        match kind {
            PieceType::Pawn => self.pawn,
            PieceType::Lance => self.lance,
            PieceType::Knight => self.knight,
            PieceType::Silver => self.silver,
            PieceType::Gold => self.gold,
            PieceType::Bishop => self.bishop,
            PieceType::Rook => self.rook,
            PieceType::King => self.king,
        }
    }
}

/// Evaluation weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Base material value per piece type.
    pub material: PieceWeights,
    /// Extra value of a promoted piece on top of its base value.
    pub promotion_bonus: PieceWeights,
    /// Multiplier applied to piece-square table entries.
    pub table_scale: f64,
    /// Fraction of material value credited for a piece in hand.
    pub hand_scale: f64,
    /// Value per pseudo-legal destination.
    pub mobility: f64,
    /// Penalty for being in check.
    pub check: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            material: PieceWeights {
                pawn: 1.0,
                lance: 3.0,
                knight: 4.0,
                silver: 5.0,
                gold: 6.0,
                bishop: 8.0,
                rook: 10.0,
                king: 0.0,
            },
            promotion_bonus: PieceWeights {
                pawn: 5.0,
                lance: 3.0,
                knight: 2.0,
                silver: 1.0,
                gold: 0.0,
                bishop: 4.0,
                rook: 4.0,
                king: 0.0,
            },
            table_scale: 0.1,
            hand_scale: 0.9,
            mobility: 0.05,
            check: 0.8,
        }
    }
}

type Table = [[i8; 9]; 9];

/// Repeats one row profile across every column.
const fn by_row(rows: [i8; 9]) -> Table {
    let mut table = [[0; 9]; 9];
    let mut r = 0;
    while r < 9 {
        table[r] = [rows[r]; 9];
        r += 1;
    }
    table
}

// Piece-square tables from the first side's point of view: row 0 is the far
// rank, column 0 is file 9.
const PAWN_TABLE: Table = by_row([0, 8, 6, 4, 3, 2, 0, 0, 0]);
const LANCE_TABLE: Table = by_row([0, 4, 3, 2, 1, 1, 1, 1, 2]);
const KNIGHT_TABLE: Table = by_row([0, 0, 5, 4, 3, 2, 1, 0, 0]);

#[rustfmt::skip]
const SILVER_TABLE: Table = [
    [0, 1, 2, 2, 2, 2, 2, 1, 0],
    [1, 2, 3, 3, 3, 3, 3, 2, 1],
    [1, 3, 4, 4, 4, 4, 4, 3, 1],
    [1, 3, 4, 5, 5, 5, 4, 3, 1],
    [1, 2, 4, 5, 5, 5, 4, 2, 1],
    [0, 2, 3, 4, 4, 4, 3, 2, 0],
    [0, 1, 2, 3, 3, 3, 2, 1, 0],
    [0, 1, 1, 2, 2, 2, 1, 1, 0],
    [0, 0, 1, 1, 1, 1, 1, 0, 0],
];

#[rustfmt::skip]
const GOLD_TABLE: Table = [
    [0, 1, 1, 1, 1, 1, 1, 1, 0],
    [1, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 3, 3, 3, 3, 3, 2, 1],
    [0, 1, 2, 2, 2, 2, 2, 1, 0],
    [0, 1, 1, 2, 2, 2, 1, 1, 0],
    [0, 1, 2, 2, 2, 2, 2, 1, 0],
    [1, 2, 3, 3, 3, 3, 3, 2, 1],
    [1, 3, 4, 4, 3, 4, 4, 3, 1],
    [0, 2, 3, 3, 2, 3, 3, 2, 0],
];

#[rustfmt::skip]
const BISHOP_TABLE: Table = [
    [2, 1, 1, 1, 1, 1, 1, 1, 2],
    [1, 4, 2, 2, 2, 2, 2, 4, 1],
    [1, 2, 4, 3, 3, 3, 4, 2, 1],
    [1, 2, 3, 5, 4, 5, 3, 2, 1],
    [1, 2, 3, 4, 6, 4, 3, 2, 1],
    [1, 2, 3, 5, 4, 5, 3, 2, 1],
    [1, 2, 4, 3, 3, 3, 4, 2, 1],
    [1, 4, 2, 2, 2, 2, 2, 4, 1],
    [2, 1, 1, 1, 1, 1, 1, 1, 2],
];

#[rustfmt::skip]
const ROOK_TABLE: Table = [
    [4, 4, 4, 4, 4, 4, 4, 4, 4],
    [6, 6, 6, 6, 6, 6, 6, 6, 6],
    [5, 5, 5, 5, 5, 5, 5, 5, 5],
    [2, 2, 2, 3, 3, 3, 2, 2, 2],
    [1, 1, 2, 2, 2, 2, 2, 1, 1],
    [1, 1, 1, 2, 2, 2, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 1, 1, 1, 1, 1, 1, 2, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

#[rustfmt::skip]
const KING_TABLE: Table = [
    [-9, -9, -9, -9, -9, -9, -9, -9, -9],
    [-8, -8, -8, -8, -8, -8, -8, -8, -8],
    [-7, -7, -7, -7, -7, -7, -7, -7, -7],
    [-6, -6, -6, -6, -6, -6, -6, -6, -6],
    [-5, -5, -5, -5, -6, -5, -5, -5, -5],
    [-3, -3, -3, -4, -4, -4, -3, -3, -3],
    [ 0,  1,  0, -2, -3, -2,  0,  1,  0],
    [ 4,  6,  4,  1,  0,  1,  4,  6,  4],
    [ 6,  8,  6,  2,  0,  2,  6,  8,  6],
];

/// Returns the piece-square table for `kind`.
pub const fn piece_square(kind: PieceType) -> &'static Table {
    match kind {
        PieceType::Pawn => &PAWN_TABLE,
        PieceType::Lance => &LANCE_TABLE,
        PieceType::Knight => &KNIGHT_TABLE,
        PieceType::Silver => &SILVER_TABLE,
        PieceType::Gold => &GOLD_TABLE,
        PieceType::Bishop => &BISHOP_TABLE,
        PieceType::Rook => &ROOK_TABLE,
        PieceType::King => &KING_TABLE,
    }
}

/// Table entry for a piece of `owner` on `sq`; the second side reads the
/// table rotated by 180 degrees.
fn table_value(kind: PieceType, owner: Owner, sq: Square) -> f64 {
    let (r, c) = match owner {
        Owner::First => (sq.row() as usize, sq.col() as usize),
        Owner::Second => (8 - sq.row() as usize, 8 - sq.col() as usize),
    };
    f64::from(piece_square(kind)[r][c])
}

/// Evaluates `position` statically. Positive favors the second side.
///
/// Material, promotion bonus and piece-square terms for board pieces,
/// discounted material for hands, a mobility difference, and a check term.
/// The side to move does not affect the score.
pub fn evaluate(position: &Position, weights: &EvalWeights) -> f64 {
    let board = &position.board;
    let mut score = 0.0;

    for (sq, piece) in board.pieces() {
        let base = weights.material.get(piece.kind);
        let bonus = if piece.promoted {
            weights.promotion_bonus.get(piece.kind)
        } else {
            0.0
        };
        let table = table_value(piece.kind, piece.owner, sq) * weights.table_scale;
        score += piece.owner.sign() * (base + bonus + table);
    }

    for owner in Owner::ALL {
        for (kind, count) in position.hands.held(owner) {
            score += owner.sign() * f64::from(count) * weights.material.get(kind) * weights.hand_scale;
        }
    }

    let mobility = count_pseudo_moves(board, Owner::Second) as f64
        - count_pseudo_moves(board, Owner::First) as f64;
    score += mobility * weights.mobility;

    if is_in_check(board, Owner::Second) {
        score -= weights.check;
    }
    if is_in_check(board, Owner::First) {
        score += weights.check;
    }

    score
}

/// Total base material on the board and in both hands, Kings excluded.
pub fn sum_material(position: &Position, weights: &EvalWeights) -> f64 {
    let on_board: f64 = position
        .board
        .pieces()
        .filter(|(_, p)| p.kind != PieceType::King)
        .map(|(_, p)| weights.material.get(p.kind))
        .sum();
    let in_hand: f64 = Owner::ALL
        .iter()
        .flat_map(|&o| position.hands.held(o))
        .map(|(kind, n)| f64::from(n) * weights.material.get(kind))
        .sum();
    on_board + in_hand
}
