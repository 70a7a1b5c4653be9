//! Game management with move history.
//!
//! The [`Game`] struct tracks the start position, every applied move, the
//! current position, and the result once the game has ended.

use crate::rules::{GameResult, RuleSet, StandardShogi};
use crate::{MoveList, Position};
use shogi_core::{Move, SfenError};
use thiserror::Error;

/// One ply as played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    pub mov: Move,
    pub usi: String,
    /// SFEN of the position the move was played from.
    pub sfen_before: String,
}

/// Why a [`Game`] refused an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("invalid USI move: {0}")]
    InvalidUsi(String),
    /// Checkmate or no legal moves was already reached.
    #[error("game has already ended")]
    GameAlreadyOver,
    #[error("no move to undo")]
    NothingToUndo,
}

/// A complete shogi game with history tracking.
///
/// Unlike [`Position`], which is a single snapshot, `Game` keeps every
/// snapshot's move so it can be listed, exported as USI, or undone.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    /// Snapshot before each ply, parallel to `moves`.
    history: Vec<Position>,
    moves: Vec<GameMove>,
    start_pos: Position,
    result: Option<GameResult>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game from the standard opening setup.
    pub fn new() -> Self {
        Self::from_position(StandardShogi.initial_position())
    }

    pub fn from_position(position: Position) -> Self {
        Game {
            position,
            history: Vec::new(),
            moves: Vec::new(),
            start_pos: position,
            result: StandardShogi.game_result(&position),
        }
    }

    pub fn from_sfen(sfen: &str) -> Result<Self, SfenError> {
        Ok(Self::from_position(Position::from_sfen(sfen)?))
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn start_position(&self) -> &Position {
        &self.start_pos
    }

    /// Concrete legal moves for the side to move.
    pub fn legal_moves(&self) -> MoveList {
        StandardShogi.generate_moves(&self.position)
    }

    pub fn is_check(&self) -> bool {
        StandardShogi.is_check(&self.position)
    }

    /// Set as soon as the side to move is mated or stuck.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Plays `m` if it is one of the legal moves.
    pub fn make_move(&mut self, m: Move) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }
        if !StandardShogi.is_legal(&self.position, m) {
            return Err(GameError::IllegalMove(m.to_usi()));
        }
        self.apply_move(m);
        Ok(())
    }

    /// Makes a move given in USI notation (e.g. `"7g7f"`, `"P*5e"`).
    pub fn make_move_usi(&mut self, usi: &str) -> Result<(), GameError> {
        let m = Move::from_usi(usi).ok_or_else(|| GameError::InvalidUsi(usi.to_string()))?;
        self.make_move(m)
    }

    /// Takes back the last move.
    pub fn undo(&mut self) -> Result<Move, GameError> {
        let previous = self.history.pop().ok_or(GameError::NothingToUndo)?;
        let undone = self.moves.pop().ok_or(GameError::NothingToUndo)?;
        self.position = previous;
        self.result = StandardShogi.game_result(&self.position);
        Ok(undone.mov)
    }

    fn apply_move(&mut self, m: Move) {
        self.moves.push(GameMove {
            mov: m,
            usi: m.to_usi(),
            sfen_before: self.position.to_sfen(),
        });
        self.history.push(self.position);
        self.position = self.position.apply_move(m);
        self.result = StandardShogi.game_result(&self.position);
    }

    pub fn to_sfen(&self) -> String {
        self.position.to_sfen()
    }

    /// Returns the USI `position` argument for this game:
    /// `startpos moves ...` or `sfen <start> moves ...`.
    pub fn to_usi_position(&self) -> String {
        let mut out = if self.start_pos == Position::startpos() {
            "startpos".to_string()
        } else {
            format!("sfen {}", self.start_pos.to_sfen())
        };
        if !self.moves.is_empty() {
            out.push_str(" moves");
            for gm in &self.moves {
                out.push(' ');
                out.push_str(&gm.usi);
            }
        }
        out
    }
}
