//! Pseudo-legal move generation.
//!
//! Moves produced here respect piece movement, blocking, and the drop
//! restrictions, but may leave the mover's King in check. The legality
//! filter in [`crate::rules`] removes those and resolves optional promotions.

mod attacks;
pub mod perft;

use crate::Board;
use shogi_core::{Hands, Move, Owner, Piece, PieceType, Promotion, Square, BOARD_SIZE};
use std::ops::ControlFlow;

pub use attacks::{is_in_check, is_square_attacked};

/// A list of moves with a fixed maximum capacity.
///
/// Shogi positions have at most 593 legal moves, so a fixed-size array
/// avoids heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Upper bound on the number of moves in any shogi position.
    pub const MAX_MOVES: usize = 600;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list. Returns false, dropping `m`, when the list is
    /// already full; only a position holding more than one set can get there.
    #[inline]
    pub fn push(&mut self, m: Move) -> bool {
        let Some(slot) = self.moves.get_mut(self.len) else {
            return false;
        };
        *slot = m;
        self.len += 1;
        true
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Returns true if the list contains `m`.
    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Extend<Move> for MoveList {
    fn extend<I: IntoIterator<Item = Move>>(&mut self, iter: I) {
        for m in iter {
            if !self.push(m) {
                break;
            }
        }
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Movement pattern of a piece, written from the first side's point of view
/// (forward is row -1). Offsets are `(row, col)` deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    /// Single-step (or jump) offsets.
    pub steps: &'static [(i8, i8)],
    /// Directions slid along until blocked.
    pub slides: &'static [(i8, i8)],
}

const ORTHOGONAL: &[(i8, i8)] = &[(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: &[(i8, i8)] = &[(-1, -1), (-1, 1), (1, -1), (1, 1)];
const KING: &[(i8, i8)] = &[
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const GOLD: &[(i8, i8)] = &[(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0)];
const SILVER: &[(i8, i8)] = &[(-1, -1), (-1, 0), (-1, 1), (1, -1), (1, 1)];
const KNIGHT: &[(i8, i8)] = &[(-2, -1), (-2, 1)];
const FORWARD: &[(i8, i8)] = &[(-1, 0)];
const NONE: &[(i8, i8)] = &[];

/// Returns the movement pattern for `piece`.
pub const fn movement(piece: Piece) -> Movement {
    let (steps, slides) = match (piece.kind, piece.promoted) {
        (PieceType::King, _) => (KING, NONE),
        (PieceType::Rook, false) => (NONE, ORTHOGONAL),
        (PieceType::Rook, true) => (DIAGONAL, ORTHOGONAL),
        (PieceType::Bishop, false) => (NONE, DIAGONAL),
        (PieceType::Bishop, true) => (ORTHOGONAL, DIAGONAL),
        (PieceType::Gold, _) | (_, true) => (GOLD, NONE),
        (PieceType::Silver, false) => (SILVER, NONE),
        (PieceType::Knight, false) => (KNIGHT, NONE),
        (PieceType::Lance, false) => (NONE, FORWARD),
        (PieceType::Pawn, false) => (FORWARD, NONE),
    };
    Movement { steps, slides }
}

/// Visits every pseudo-legal destination of `piece` standing on `from`.
///
/// Stops early when `visit` breaks.
pub(crate) fn visit_destinations<F>(
    board: &Board,
    from: Square,
    piece: Piece,
    mut visit: F,
) -> ControlFlow<()>
where
    F: FnMut(Square) -> ControlFlow<()>,
{
    let Movement { steps, slides } = movement(piece);
    // Patterns are written for the first side; flip rows for the second.
    let orient = -piece.owner.forward();

    for &(dr, dc) in steps {
        let Some(to) = from.offset(dr * orient, dc) else {
            continue;
        };
        match board.get(to) {
            Some(other) if other.owner == piece.owner => {}
            _ => visit(to)?,
        }
    }

    for &(dr, dc) in slides {
        let mut cur = from;
        while let Some(to) = cur.offset(dr * orient, dc) {
            match board.get(to) {
                None => visit(to)?,
                Some(other) => {
                    if other.owner != piece.owner {
                        visit(to)?;
                    }
                    break;
                }
            }
            cur = to;
        }
    }

    ControlFlow::Continue(())
}

/// Returns the promotion tag for `piece` moving from row `from` to row `to`.
pub fn promotion_for(piece: Piece, from: u8, to: u8) -> Promotion {
    let owner = piece.owner;
    if !piece.can_promote() || !(owner.in_promotion_zone(from) || owner.in_promotion_zone(to)) {
        return Promotion::None;
    }
    let depth = owner.rows_from_far_end(to);
    match piece.kind {
        PieceType::Pawn | PieceType::Lance if depth == 0 => Promotion::Must,
        PieceType::Knight if depth <= 1 => Promotion::Must,
        _ => Promotion::Optional,
    }
}

/// Generates pseudo-legal board moves for the piece on `from`.
///
/// Returns an empty list if the square is empty.
pub fn pseudo_moves(board: &Board, from: Square) -> MoveList {
    let mut list = MoveList::new();
    if let Some(piece) = board.get(from) {
        let _ = visit_destinations(board, from, piece, |to| {
            let promotion = promotion_for(piece, from.row(), to.row());
            list.push(Move::board(from, to, promotion));
            ControlFlow::Continue(())
        });
    }
    list
}

/// Counts pseudo-legal destinations for every piece `owner` has on the board.
///
/// Promotion variants are not counted separately.
pub fn count_pseudo_moves(board: &Board, owner: Owner) -> usize {
    let mut count = 0;
    for (from, piece) in board.pieces_of(owner) {
        let _ = visit_destinations(board, from, piece, |_| {
            count += 1;
            ControlFlow::Continue(())
        });
    }
    count
}

/// Returns true if a piece of `kind` dropped by `owner` on `row` could never move again.
pub const fn is_dead_drop(kind: PieceType, owner: Owner, row: u8) -> bool {
    let depth = owner.rows_from_far_end(row);
    match kind {
        PieceType::Pawn | PieceType::Lance => depth == 0,
        PieceType::Knight => depth <= 1,
        _ => false,
    }
}

/// Generates pseudo-legal drops for `owner`.
///
/// Excludes a second unpromoted Pawn on a file and drops that leave a piece
/// with no further move. Does not check for self-check.
pub fn pseudo_drops(board: &Board, hands: &Hands, owner: Owner) -> MoveList {
    let mut list = MoveList::new();
    for (kind, _) in hands.held(owner) {
        for col in 0..BOARD_SIZE {
            if kind == PieceType::Pawn && board.has_unpromoted_pawn_on_col(owner, col) {
                continue;
            }
            for row in 0..BOARD_SIZE {
                let to = Square::new(row, col);
                if board.is_empty_at(to) && !is_dead_drop(kind, owner, row) {
                    list.push(Move::drop(kind, to));
                }
            }
        }
    }
    list
}
