//! Move representation.

use crate::{PieceType, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Promotion tag carried by a board move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Promotion {
    /// The piece keeps its current state.
    None,
    /// The piece may promote or not. Only produced by the pseudo-move
    /// generator; the legality filter resolves it to `None` or `Must`.
    Optional,
    /// The piece promotes.
    Must,
}

/// A shogi move: either a board move or a drop from hand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoveRepr", into = "MoveRepr")]
pub enum Move {
    /// Move a piece already on the board.
    Board {
        from: Square,
        to: Square,
        promotion: Promotion,
    },
    /// Place a piece from hand on an empty square.
    Drop { to: Square, piece: PieceType },
}

/// Wire form of a move: `{ from?, to, drop?, promotion }`.
#[derive(Serialize, Deserialize)]
struct MoveRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<Square>,
    to: Square,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    drop: Option<PieceType>,
    promotion: Promotion,
}

impl TryFrom<MoveRepr> for Move {
    type Error = String;

    fn try_from(repr: MoveRepr) -> Result<Self, Self::Error> {
        match (repr.from, repr.drop) {
            (_, Some(piece)) if !piece.is_droppable() => {
                Err(format!("{} cannot be dropped", piece))
            }
            (None, Some(piece)) => Ok(Move::Drop { to: repr.to, piece }),
            (Some(from), None) => Ok(Move::Board {
                from,
                to: repr.to,
                promotion: repr.promotion,
            }),
            (Some(_), Some(_)) => Err("a move cannot have both `from` and `drop`".to_string()),
            (None, None) => Err("a move needs either `from` or `drop`".to_string()),
        }
    }
}

impl From<Move> for MoveRepr {
    fn from(m: Move) -> Self {
        match m {
            Move::Board {
                from,
                to,
                promotion,
            } => MoveRepr {
                from: Some(from),
                to,
                drop: None,
                promotion,
            },
            Move::Drop { to, piece } => MoveRepr {
                from: None,
                to,
                drop: Some(piece),
                promotion: Promotion::None,
            },
        }
    }
}

impl Move {
    /// Placeholder value for fixed-capacity move lists; never a legal move.
    pub const NULL: Move = Move::Board {
        from: Square(0),
        to: Square(0),
        promotion: Promotion::None,
    };

    /// Creates a board move.
    #[inline]
    pub const fn board(from: Square, to: Square, promotion: Promotion) -> Self {
        Move::Board {
            from,
            to,
            promotion,
        }
    }

    /// Creates a board move that keeps the piece's promotion state.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::board(from, to, Promotion::None)
    }

    /// Creates a drop.
    #[inline]
    pub const fn drop(piece: PieceType, to: Square) -> Self {
        Move::Drop { to, piece }
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        match self {
            Move::Board { to, .. } | Move::Drop { to, .. } => to,
        }
    }

    /// Returns the origin square, or `None` for drops.
    #[inline]
    pub const fn from(self) -> Option<Square> {
        match self {
            Move::Board { from, .. } => Some(from),
            Move::Drop { .. } => None,
        }
    }

    /// Returns the promotion tag (always `None` for drops).
    #[inline]
    pub const fn promotion(self) -> Promotion {
        match self {
            Move::Board { promotion, .. } => promotion,
            Move::Drop { .. } => Promotion::None,
        }
    }

    /// Returns true if this is a drop.
    #[inline]
    pub const fn is_drop(self) -> bool {
        matches!(self, Move::Drop { .. })
    }

    /// Returns the same move with another promotion tag. Drops are unchanged.
    #[inline]
    pub const fn with_promotion(self, promotion: Promotion) -> Self {
        match self {
            Move::Board { from, to, .. } => Move::Board {
                from,
                to,
                promotion,
            },
            drop @ Move::Drop { .. } => drop,
        }
    }

    /// Returns the USI notation for this move (e.g. `"7g7f"`, `"8h2b+"`, `"P*5e"`).
    ///
    /// An unresolved `Optional` tag is written without `+`.
    pub fn to_usi(self) -> String {
        match self {
            Move::Board {
                from,
                to,
                promotion,
            } => {
                let promo = if promotion == Promotion::Must { "+" } else { "" };
                format!("{}{}{}", from, to, promo)
            }
            Move::Drop { to, piece } => format!("{}*{}", piece.letter(), to),
        }
    }

    /// Parses a move from USI notation.
    ///
    /// `resign`, `win`, `none`, and malformed tokens return `None`. The move
    /// is not validated against any position.
    pub fn from_usi(s: &str) -> Option<Self> {
        match s {
            "" | "resign" | "win" | "none" => return None,
            _ => {}
        }

        if let Some((piece, square)) = s.split_once('*') {
            let mut chars = piece.chars();
            let letter = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            let (piece, _) = PieceType::from_sfen_char(letter.to_ascii_uppercase())?;
            if !piece.is_droppable() {
                return None;
            }
            let to = Square::from_usi(square.get(..2)?)?;
            return Some(Move::drop(piece, to));
        }

        let (body, promotion) = match s.strip_suffix('+') {
            Some(body) => (body, Promotion::Must),
            None => (s, Promotion::None),
        };
        if body.len() < 4 {
            return None;
        }
        let from = Square::from_usi(body.get(0..2)?)?;
        let to = Square::from_usi(body.get(2..4)?)?;
        Some(Move::board(from, to, promotion))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.promotion() {
            Promotion::Optional => write!(f, "Move({}?)", self.to_usi()),
            _ => write!(f, "Move({})", self.to_usi()),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_usi())
    }
}
