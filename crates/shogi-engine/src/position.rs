//! Position representation.

use crate::Board;
use serde::{Deserialize, Serialize};
use shogi_core::{
    check_piece_counts, Hands, Move, Owner, Piece, PieceCountError, PieceType, Promotion,
    SfenError, SfenParser, Square,
};

/// A complete game state: board, hands, and the side to move.
///
/// Positions are immutable snapshots. [`Position::apply_move`] returns a new
/// position and leaves `self` untouched, so search can branch freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PositionRepr")]
pub struct Position {
    /// Piece placement.
    pub board: Board,
    /// Captured pieces available to drop.
    pub hands: Hands,
    /// Side to move.
    #[serde(rename = "turn")]
    pub side_to_move: Owner,
}

#[derive(Deserialize)]
struct PositionRepr {
    board: Board,
    hands: Hands,
    turn: Owner,
}

impl TryFrom<PositionRepr> for Position {
    type Error = PieceCountError;

    fn try_from(repr: PositionRepr) -> Result<Self, Self::Error> {
        check_piece_counts(repr.board.pieces().map(|(_, p)| p), &repr.hands)?;
        Ok(Position::new(repr.board, repr.hands, repr.turn))
    }
}

/// Back rank order, left to right, shared by both sides.
const BACK_RANK: [PieceType; 9] = [
    PieceType::Lance,
    PieceType::Knight,
    PieceType::Silver,
    PieceType::Gold,
    PieceType::King,
    PieceType::Gold,
    PieceType::Silver,
    PieceType::Knight,
    PieceType::Lance,
];

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        let mut board = Board::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            board.set(Square::new(0, col), Some(Piece::new(kind, Owner::Second)));
            board.set(Square::new(8, col), Some(Piece::new(kind, Owner::First)));
            board.set(Square::new(2, col), Some(Piece::new(PieceType::Pawn, Owner::Second)));
            board.set(Square::new(6, col), Some(Piece::new(PieceType::Pawn, Owner::First)));
        }
        board.set(Square::new(1, 1), Some(Piece::new(PieceType::Rook, Owner::Second)));
        board.set(Square::new(1, 7), Some(Piece::new(PieceType::Bishop, Owner::Second)));
        board.set(Square::new(7, 1), Some(Piece::new(PieceType::Bishop, Owner::First)));
        board.set(Square::new(7, 7), Some(Piece::new(PieceType::Rook, Owner::First)));

        Position {
            board,
            hands: Hands::empty(),
            side_to_move: Owner::First,
        }
    }

    /// Creates an empty position with the first side to move.
    pub const fn empty() -> Self {
        Position {
            board: Board::empty(),
            hands: Hands::empty(),
            side_to_move: Owner::First,
        }
    }

    /// Creates a position from its parts.
    pub const fn new(board: Board, hands: Hands, side_to_move: Owner) -> Self {
        Position {
            board,
            hands,
            side_to_move,
        }
    }

    /// Returns a copy with `piece` placed on `sq`. Handy for building test positions.
    pub fn with_piece(mut self, sq: Square, piece: Piece) -> Self {
        self.board.set(sq, Some(piece));
        self
    }

    /// Returns a copy with `count` pieces of `kind` in `owner`'s hand.
    pub fn with_hand(mut self, owner: Owner, kind: PieceType, count: u32) -> Self {
        self.hands.set(owner, kind, count);
        self
    }

    /// Returns a copy with `owner` to move.
    pub fn with_side_to_move(mut self, owner: Owner) -> Self {
        self.side_to_move = owner;
        self
    }

    /// Parses a position from SFEN. The move number is accepted and ignored.
    ///
    /// Rejects placements that need more pieces than one set holds,
    /// including a second King for either side.
    pub fn from_sfen(sfen: &str) -> Result<Self, SfenError> {
        let parsed = SfenParser::parse(sfen)?;
        Ok(Position {
            board: Board::from_rows(&parsed.placement),
            hands: parsed.hands,
            side_to_move: parsed.side_to_move,
        })
    }

    /// Encodes the position as SFEN with the constant move number `1`.
    pub fn to_sfen(&self) -> String {
        SfenParser {
            placement: self.board.to_rows(),
            side_to_move: self.side_to_move,
            hands: self.hands,
            move_number: SfenParser::MOVE_NUMBER,
        }
        .to_sfen()
    }

    /// Applies a move for the side to move and returns the new position.
    ///
    /// The move is not validated. See [`Position::apply_move_for`].
    pub fn apply_move(&self, m: Move) -> Position {
        self.apply_move_for(self.side_to_move, m)
    }

    /// Applies a move played by `mover` and returns the new position, with
    /// the opponent of `mover` to move.
    ///
    /// A drop takes one piece from the mover's hand and places it
    /// unpromoted. A board move captures whatever stands on the destination
    /// (demoted into the mover's hand, Kings excepted) and promotes the piece
    /// only for [`Promotion::Must`]; `Optional` is treated as `None`.
    pub fn apply_move_for(&self, mover: Owner, m: Move) -> Position {
        let mut next = *self;
        next.side_to_move = mover.opposite();

        match m {
            Move::Drop { to, piece } => {
                next.hands.remove(mover, piece);
                next.board.set(to, Some(Piece::new(piece, mover)));
            }
            Move::Board {
                from,
                to,
                promotion,
            } => {
                let Some(piece) = self.board.get(from) else {
                    return next;
                };
                if let Some(captured) = self.board.get(to) {
                    next.hands.add(mover, captured.kind);
                }
                next.board.set(from, None);
                next.board.set(
                    to,
                    Some(Piece {
                        promoted: piece.promoted || promotion == Promotion::Must,
                        ..piece
                    }),
                );
            }
        }

        next
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
