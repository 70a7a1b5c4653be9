//! Side representation.

use serde::{Deserialize, Serialize};

/// The two sides of a shogi game.
///
/// The first side moves first and advances toward row 0; the second side
/// advances toward row 8. In SFEN/USI text they are `b` and `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Owner {
    #[serde(rename = "b")]
    First = 0,
    #[serde(rename = "w")]
    Second = 1,
}

impl Owner {
    /// Both sides in order.
    pub const ALL: [Owner; 2] = [Owner::First, Owner::Second];

    /// Returns the other side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Owner::First => Owner::Second,
            Owner::Second => Owner::First,
        }
    }

    /// Returns the index (0 for First, 1 for Second).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row delta of a single forward step.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Owner::First => -1,
            Owner::Second => 1,
        }
    }

    /// Distance of `row` from this side's farthest rank (0 = farthest rank).
    #[inline]
    pub const fn rows_from_far_end(self, row: u8) -> u8 {
        match self {
            Owner::First => row,
            Owner::Second => 8 - row,
        }
    }

    /// Returns true if `row` lies in this side's promotion zone.
    #[inline]
    pub const fn in_promotion_zone(self, row: u8) -> bool {
        self.rows_from_far_end(row) <= 2
    }

    /// Sign used by the evaluator: positive scores favor the second side.
    #[inline]
    pub const fn sign(self) -> f64 {
        match self {
            Owner::First => -1.0,
            Owner::Second => 1.0,
        }
    }

    /// Returns the SFEN side-to-move letter.
    #[inline]
    pub const fn to_sfen_char(self) -> char {
        match self {
            Owner::First => 'b',
            Owner::Second => 'w',
        }
    }

    /// Parses a SFEN side-to-move letter.
    #[inline]
    pub const fn from_sfen_char(c: char) -> Option<Self> {
        match c {
            'b' => Some(Owner::First),
            'w' => Some(Owner::Second),
            _ => None,
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Owner::First => write!(f, "First"),
            Owner::Second => write!(f, "Second"),
        }
    }
}
