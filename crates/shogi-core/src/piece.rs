//! Piece representation.

use crate::Owner;
use serde::{Deserialize, Serialize};

/// The eight base piece types.
///
/// Promotion is tracked on [`Piece`], never as a separate type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceType {
    #[serde(rename = "P")]
    Pawn = 0,
    #[serde(rename = "L")]
    Lance = 1,
    #[serde(rename = "N")]
    Knight = 2,
    #[serde(rename = "S")]
    Silver = 3,
    #[serde(rename = "G")]
    Gold = 4,
    #[serde(rename = "B")]
    Bishop = 5,
    #[serde(rename = "R")]
    Rook = 6,
    #[serde(rename = "K")]
    King = 7,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 8] = [
        PieceType::Pawn,
        PieceType::Lance,
        PieceType::Knight,
        PieceType::Silver,
        PieceType::Gold,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::King,
    ];

    /// Piece types that can be held in hand, in drop-generation order.
    pub const HAND: [PieceType; 7] = [
        PieceType::Pawn,
        PieceType::Lance,
        PieceType::Knight,
        PieceType::Silver,
        PieceType::Gold,
        PieceType::Bishop,
        PieceType::Rook,
    ];

    /// Hand pieces in SFEN precedence order.
    pub const SFEN_HAND_ORDER: [PieceType; 7] = [
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Gold,
        PieceType::Silver,
        PieceType::Knight,
        PieceType::Lance,
        PieceType::Pawn,
    ];

    /// Returns the index of this piece type (0-7).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true if pieces of this type may ever promote.
    #[inline]
    pub const fn can_promote(self) -> bool {
        !matches!(self, PieceType::Gold | PieceType::King)
    }

    /// Returns true if this type can be captured into hand and dropped.
    #[inline]
    pub const fn is_droppable(self) -> bool {
        !matches!(self, PieceType::King)
    }

    /// How many pieces of this type one set holds, both sides together.
    pub const fn set_size(self) -> u32 {
        match self {
            PieceType::Pawn => 18,
            PieceType::Lance | PieceType::Knight | PieceType::Silver | PieceType::Gold => 4,
            PieceType::Bishop | PieceType::Rook | PieceType::King => 2,
        }
    }

    /// Returns the uppercase SFEN letter.
    pub const fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Lance => 'L',
            PieceType::Knight => 'N',
            PieceType::Silver => 'S',
            PieceType::Gold => 'G',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::King => 'K',
        }
    }

    /// Returns the SFEN letter for this type owned by `owner`.
    pub const fn to_sfen_char(self, owner: Owner) -> char {
        let c = self.letter();
        match owner {
            Owner::First => c,
            Owner::Second => c.to_ascii_lowercase(),
        }
    }

    /// Parses a SFEN letter into a piece type and owner.
    pub const fn from_sfen_char(c: char) -> Option<(PieceType, Owner)> {
        let owner = if c.is_ascii_uppercase() {
            Owner::First
        } else {
            Owner::Second
        };
        let kind = match c.to_ascii_uppercase() {
            'P' => PieceType::Pawn,
            'L' => PieceType::Lance,
            'N' => PieceType::Knight,
            'S' => PieceType::Silver,
            'G' => PieceType::Gold,
            'B' => PieceType::Bishop,
            'R' => PieceType::Rook,
            'K' => PieceType::King,
            _ => return None,
        };
        Some((kind, owner))
    }
}

impl std::fmt::Display for PieceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceType::Pawn => "Pawn",
            PieceType::Lance => "Lance",
            PieceType::Knight => "Knight",
            PieceType::Silver => "Silver",
            PieceType::Gold => "Gold",
            PieceType::Bishop => "Bishop",
            PieceType::Rook => "Rook",
            PieceType::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "type")]
    pub kind: PieceType,
    pub owner: Owner,
    #[serde(default)]
    pub promoted: bool,
}

impl Piece {
    /// Creates an unpromoted piece.
    #[inline]
    pub const fn new(kind: PieceType, owner: Owner) -> Self {
        Piece {
            kind,
            owner,
            promoted: false,
        }
    }

    /// Creates a promoted piece.
    #[inline]
    pub const fn promoted(kind: PieceType, owner: Owner) -> Self {
        Piece {
            kind,
            owner,
            promoted: true,
        }
    }

    /// Returns true if this piece may still promote.
    #[inline]
    pub const fn can_promote(self) -> bool {
        self.kind.can_promote() && !self.promoted
    }

    /// Moves like a Gold: a Gold, or a promoted Silver, Knight, Lance, or Pawn.
    #[inline]
    pub const fn moves_like_gold(self) -> bool {
        match self.kind {
            PieceType::Gold => true,
            PieceType::Pawn | PieceType::Lance | PieceType::Knight | PieceType::Silver => {
                self.promoted
            }
            _ => false,
        }
    }

    /// Writes the SFEN token for this piece (`+` prefix when promoted).
    pub fn to_sfen(self) -> String {
        let c = self.kind.to_sfen_char(self.owner);
        if self.promoted {
            format!("+{}", c)
        } else {
            c.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_to_sfen() {
        assert_eq!(PieceType::Pawn.to_sfen_char(Owner::First), 'P');
        assert_eq!(PieceType::Pawn.to_sfen_char(Owner::Second), 'p');
        assert_eq!(Piece::promoted(PieceType::Rook, Owner::Second).to_sfen(), "+r");
        assert_eq!(Piece::new(PieceType::King, Owner::First).to_sfen(), "K");
    }

    #[test]
    fn piece_from_sfen() {
        assert_eq!(
            PieceType::from_sfen_char('N'),
            Some((PieceType::Knight, Owner::First))
        );
        assert_eq!(
            PieceType::from_sfen_char('s'),
            Some((PieceType::Silver, Owner::Second))
        );
        assert_eq!(PieceType::from_sfen_char('x'), None);
        assert_eq!(PieceType::from_sfen_char('Q'), None);
    }

    #[test]
    fn promotion_rules() {
        assert!(!PieceType::Gold.can_promote());
        assert!(!PieceType::King.can_promote());
        assert!(PieceType::Lance.can_promote());
        assert!(!Piece::promoted(PieceType::Pawn, Owner::First).can_promote());
    }

    #[test]
    fn gold_movers() {
        assert!(Piece::new(PieceType::Gold, Owner::First).moves_like_gold());
        assert!(Piece::promoted(PieceType::Silver, Owner::First).moves_like_gold());
        assert!(Piece::promoted(PieceType::Pawn, Owner::Second).moves_like_gold());
        assert!(!Piece::new(PieceType::Silver, Owner::First).moves_like_gold());
        assert!(!Piece::promoted(PieceType::Rook, Owner::First).moves_like_gold());
    }

    #[test]
    fn piece_json_shape() {
        let piece: Piece = serde_json::from_str(r#"{"type":"S","owner":"w"}"#).unwrap();
        assert_eq!(piece, Piece::new(PieceType::Silver, Owner::Second));
        let json = serde_json::to_string(&Piece::promoted(PieceType::Bishop, Owner::First)).unwrap();
        assert_eq!(json, r#"{"type":"B","owner":"b","promoted":true}"#);
    }
}
