//! SFEN parsing and validation.

use crate::{check_piece_counts, Hands, Owner, Piece, PieceCountError, PieceType, BOARD_SIZE};
use thiserror::Error;

/// Errors that can occur when parsing SFEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SfenError {
    #[error("invalid SFEN: expected 3 or 4 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid side to move: expected 'b' or 'w', got '{0}'")]
    InvalidSideToMove(String),

    #[error("invalid hands: {0}")]
    InvalidHands(String),

    #[error("invalid move number: {0}")]
    InvalidMoveNumber(String),

    #[error(transparent)]
    PieceCount(#[from] PieceCountError),
}

/// Parsed SFEN data.
///
/// Holds the validated placement grid, side to move, hands and move number.
/// The engine converts this into its own position representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfenParser {
    /// Pieces indexed `[row][col]`, row 0 first.
    pub placement: [[Option<Piece>; 9]; 9],
    /// Side to move.
    pub side_to_move: Owner,
    /// Pieces in hand.
    pub hands: Hands,
    /// Move number (informational only).
    pub move_number: u32,
}

impl SfenParser {
    /// The standard starting position.
    pub const STARTPOS: &'static str =
        "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

    /// Move number written by [`SfenParser::to_sfen`]; the engine protocol
    /// does not depend on it.
    pub const MOVE_NUMBER: u32 = 1;

    /// Parses a SFEN string. The move number may be omitted.
    pub fn parse(sfen: &str) -> Result<Self, SfenError> {
        let parts: Vec<&str> = sfen.split_whitespace().collect();

        if parts.len() != 3 && parts.len() != 4 {
            return Err(SfenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "b" => Owner::First,
            "w" => Owner::Second,
            other => return Err(SfenError::InvalidSideToMove(other.to_string())),
        };

        let hands = Self::parse_hands(parts[2])?;
        check_piece_counts(placement.iter().flatten().flatten().copied(), &hands)?;

        let move_number = match parts.get(3) {
            Some(n) => n
                .parse::<u32>()
                .map_err(|_| SfenError::InvalidMoveNumber(n.to_string()))?,
            None => Self::MOVE_NUMBER,
        };

        Ok(SfenParser {
            placement,
            side_to_move,
            hands,
            move_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<[[Option<Piece>; 9]; 9], SfenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_SIZE as usize {
            return Err(SfenError::InvalidPiecePlacement(format!(
                "expected 9 ranks, got {}",
                ranks.len()
            )));
        }

        let mut grid = [[None; 9]; 9];
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0usize;
            let mut promoted = false;
            for c in rank.chars() {
                if let Some(n) = c.to_digit(10) {
                    if promoted || n == 0 {
                        return Err(SfenError::InvalidPiecePlacement(format!(
                            "unexpected '{}' in rank {}",
                            c,
                            row + 1
                        )));
                    }
                    col += n as usize;
                } else if c == '+' {
                    if promoted {
                        return Err(SfenError::InvalidPiecePlacement(format!(
                            "doubled '+' in rank {}",
                            row + 1
                        )));
                    }
                    promoted = true;
                } else if let Some((kind, owner)) = PieceType::from_sfen_char(c) {
                    if promoted && !kind.can_promote() {
                        return Err(SfenError::InvalidPiecePlacement(format!(
                            "{} cannot be promoted",
                            kind
                        )));
                    }
                    if col < 9 {
                        grid[row][col] = Some(Piece {
                            kind,
                            owner,
                            promoted,
                        });
                    }
                    col += 1;
                    promoted = false;
                } else {
                    return Err(SfenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        row + 1
                    )));
                }
            }
            if promoted || col != 9 {
                return Err(SfenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 9",
                    row + 1,
                    col
                )));
            }
        }

        Ok(grid)
    }

    fn parse_hands(field: &str) -> Result<Hands, SfenError> {
        let mut hands = Hands::empty();
        if field == "-" {
            return Ok(hands);
        }

        let mut count: Option<u32> = None;
        for c in field.chars() {
            if let Some(d) = c.to_digit(10) {
                let n = count.unwrap_or(0) * 10 + d;
                if n > PieceType::Pawn.set_size() {
                    return Err(SfenError::InvalidHands(format!("count {} is too large", n)));
                }
                count = Some(n);
                continue;
            }
            let (kind, owner) = PieceType::from_sfen_char(c)
                .filter(|(kind, _)| kind.is_droppable())
                .ok_or_else(|| SfenError::InvalidHands(format!("invalid character '{}'", c)))?;
            let n = count.take().unwrap_or(1);
            if n == 0 {
                return Err(SfenError::InvalidHands(format!("zero count for '{}'", c)));
            }
            hands.set(owner, kind, hands.count(owner, kind) + n);
        }
        if count.is_some() {
            return Err(SfenError::InvalidHands("trailing count".to_string()));
        }
        Ok(hands)
    }

    /// Writes the placement field.
    pub fn placement_to_sfen(placement: &[[Option<Piece>; 9]; 9]) -> String {
        let mut ranks = Vec::with_capacity(9);
        for row in placement {
            let mut line = String::new();
            let mut empty = 0;
            for cell in row {
                match cell {
                    Some(piece) => {
                        if empty > 0 {
                            line.push_str(&empty.to_string());
                            empty = 0;
                        }
                        line.push_str(&piece.to_sfen());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                line.push_str(&empty.to_string());
            }
            ranks.push(line);
        }
        ranks.join("/")
    }

    /// Converts back to a SFEN string.
    pub fn to_sfen(&self) -> String {
        format!(
            "{} {} {} {}",
            Self::placement_to_sfen(&self.placement),
            self.side_to_move.to_sfen_char(),
            self.hands.to_sfen(),
            self.move_number
        )
    }
}

impl Default for SfenParser {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}
