//! Board square representation.

use crate::BOARD_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A square on the shogi board, indexed 0-80.
///
/// Squares are indexed row-major from the top-left corner:
/// - (row 0, col 0) = 0 is USI `9a`
/// - (row 8, col 8) = 80 is USI `1i`
///
/// Row 0 is the second side's back rank.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Coords", into = "Coords")]
pub struct Square(pub(crate) u8);

/// Wire form of a square: `{ "r": row, "c": col }`.
#[derive(Serialize, Deserialize)]
struct Coords {
    r: u8,
    c: u8,
}

impl TryFrom<Coords> for Square {
    type Error = String;

    fn try_from(coords: Coords) -> Result<Self, Self::Error> {
        Square::from_coords(coords.r as i8, coords.c as i8)
            .ok_or_else(|| format!("square ({}, {}) is off the board", coords.r, coords.c))
    }
}

impl From<Square> for Coords {
    fn from(sq: Square) -> Self {
        Coords {
            r: sq.row(),
            c: sq.col(),
        }
    }
}

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 81;

    /// Creates a square from row and column.
    ///
    /// Both must be in 0-8; checked in debug builds.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Square(row * BOARD_SIZE + col)
    }

    /// Creates a square from signed coordinates, or `None` if off the board.
    #[inline]
    pub const fn from_coords(row: i8, col: i8) -> Option<Self> {
        if row >= 0 && row < BOARD_SIZE as i8 && col >= 0 && col < BOARD_SIZE as i8 {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Returns the index (0-80).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the row (0 = top, the second side's back rank).
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    /// Returns the column (0 = leftmost, USI file 9).
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    /// Returns the square displaced by (`dr`, `dc`), or `None` if off the board.
    #[inline]
    pub const fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Square::from_coords(self.row() as i8 + dr, self.col() as i8 + dc)
    }

    /// Iterates over all 81 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::COUNT as u8).map(Square)
    }

    /// Parses a USI square (file digit 1-9, rank letter a-i), e.g. `"7g"`.
    pub fn from_usi(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = match bytes[0] {
            b @ b'1'..=b'9' => b - b'0',
            _ => return None,
        };
        let row = match bytes[1] {
            b @ b'a'..=b'i' => b - b'a',
            _ => return None,
        };
        Some(Square::new(row, BOARD_SIZE - file))
    }

    /// Returns the USI notation for this square.
    pub fn to_usi(self) -> String {
        let file = (b'0' + (BOARD_SIZE - self.col())) as char;
        let rank = (b'a' + self.row()) as char;
        format!("{}{}", file, rank)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_usi())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_usi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_new() {
        let sq = Square::new(6, 2);
        assert_eq!(sq.row(), 6);
        assert_eq!(sq.col(), 2);
        assert_eq!(sq.index(), 56);
    }

    #[test]
    fn square_from_usi() {
        assert_eq!(Square::from_usi("7g"), Some(Square::new(6, 2)));
        assert_eq!(Square::from_usi("9a"), Some(Square::new(0, 0)));
        assert_eq!(Square::from_usi("1i"), Some(Square::new(8, 8)));
        assert_eq!(Square::from_usi("5e"), Some(Square::new(4, 4)));
        assert_eq!(Square::from_usi("0a"), None);
        assert_eq!(Square::from_usi("1j"), None);
        assert_eq!(Square::from_usi(""), None);
        assert_eq!(Square::from_usi("7g7"), None);
    }

    #[test]
    fn square_to_usi() {
        assert_eq!(Square::new(6, 2).to_usi(), "7g");
        assert_eq!(Square::new(0, 8).to_usi(), "1a");
        assert_eq!(format!("{}", Square::new(4, 4)), "5e");
    }

    #[test]
    fn offsets_stay_on_board() {
        let corner = Square::new(0, 0);
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
        assert_eq!(corner.offset(1, 1), Some(Square::new(1, 1)));
        assert_eq!(Square::new(8, 8).offset(1, 0), None);
    }

    #[test]
    fn all_squares() {
        assert_eq!(Square::all().count(), 81);
        assert_eq!(Square::all().last(), Some(Square::new(8, 8)));
    }

    #[test]
    fn json_coords() {
        let sq: Square = serde_json::from_str(r#"{"r":2,"c":7}"#).unwrap();
        assert_eq!(sq, Square::new(2, 7));
        assert_eq!(serde_json::to_string(&sq).unwrap(), r#"{"r":2,"c":7}"#);
        assert!(serde_json::from_str::<Square>(r#"{"r":9,"c":0}"#).is_err());
    }
}
