//! JSON request and response shapes.

use serde::{Deserialize, Serialize};
use shogi_core::Move;
use shogi_engine::Position;

/// Default search depth for requests that leave it out.
pub const DEFAULT_DEPTH: u32 = 5;
/// Default time budget in milliseconds.
pub const DEFAULT_TIME_MS: u64 = 1000;

/// What the caller wants from the AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Choose a move.
    #[default]
    Bestmove,
    /// Score the position.
    Evaluate,
}

/// A request for a move or an evaluation.
///
/// ```json
/// { "board": [[...], ...], "hands": {"b": {...}, "w": {...}}, "turn": "b",
///   "depth": 5, "timeMs": 1000, "mode": "bestmove" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRequest {
    #[serde(flatten)]
    pub position: Position,
    #[serde(default = "default_depth")]
    pub depth: u32,
    #[serde(default = "default_time_ms")]
    pub time_ms: u64,
    #[serde(default)]
    pub mode: Mode,
}

fn default_depth() -> u32 {
    DEFAULT_DEPTH
}

fn default_time_ms() -> u64 {
    DEFAULT_TIME_MS
}

impl AiRequest {
    /// A move request with default limits.
    pub fn bestmove(position: Position) -> Self {
        AiRequest {
            position,
            depth: DEFAULT_DEPTH,
            time_ms: DEFAULT_TIME_MS,
            mode: Mode::Bestmove,
        }
    }

    /// An evaluation request with default limits.
    pub fn evaluate(position: Position) -> Self {
        AiRequest {
            mode: Mode::Evaluate,
            ..Self::bestmove(position)
        }
    }
}

/// Outcome of an evaluation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Engine score, side-to-move relative, mates folded to +-100000.
    Score(i32),
    /// Evaluation is turned off in the configuration.
    Disabled,
    /// The engine could not produce a score.
    Unavailable { reason: String },
}

/// JSON reply printed by `shogi-ai`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AiResponse {
    Move {
        #[serde(rename = "move")]
        mv: Option<Move>,
    },
    Score {
        score: i32,
    },
    Disabled {
        score: Option<i32>,
        disabled: bool,
    },
    Error {
        error: String,
        detail: String,
    },
}

impl From<Evaluation> for AiResponse {
    fn from(eval: Evaluation) -> Self {
        match eval {
            Evaluation::Score(score) => AiResponse::Score { score },
            Evaluation::Disabled => AiResponse::Disabled {
                score: None,
                disabled: true,
            },
            Evaluation::Unavailable { reason } => AiResponse::Error {
                error: "engine unavailable".to_string(),
                detail: reason,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shogi_core::{Owner, PieceType, Square};

    #[test]
    fn defaults_fill_missing_fields() {
        let pos = Position::startpos();
        let mut value = serde_json::to_value(pos).unwrap();
        value["turn"] = json!("w");
        let req: AiRequest = serde_json::from_value(value).unwrap();
        assert_eq!(req.depth, 5);
        assert_eq!(req.time_ms, 1000);
        assert_eq!(req.mode, Mode::Bestmove);
        assert_eq!(req.position.side_to_move, Owner::Second);
        assert_eq!(req.position.board, pos.board);
    }

    #[test]
    fn camel_case_fields() {
        let mut value = serde_json::to_value(Position::startpos()).unwrap();
        value["timeMs"] = json!(250);
        value["depth"] = json!(3);
        value["mode"] = json!("evaluate");
        let req: AiRequest = serde_json::from_value(value).unwrap();
        assert_eq!(req.time_ms, 250);
        assert_eq!(req.depth, 3);
        assert_eq!(req.mode, Mode::Evaluate);

        let out = serde_json::to_value(&req).unwrap();
        assert_eq!(out["timeMs"], 250);
        assert_eq!(out["turn"], "b");
    }

    #[test]
    fn oversized_requests() {
        let mut value = serde_json::to_value(Position::startpos()).unwrap();
        value["timeMs"] = json!(u64::MAX);
        let req: AiRequest = serde_json::from_value(value).unwrap();
        assert_eq!(crate::select_movetime(req.depth, req.time_ms), 2000);

        let mut value = serde_json::to_value(Position::startpos()).unwrap();
        value["hands"]["w"]["R"] = json!(1);
        assert!(serde_json::from_value::<AiRequest>(value).is_err());
    }

    #[test]
    fn response_shapes() {
        let mv = Move::drop(PieceType::Pawn, Square::new(4, 4));
        assert_eq!(
            serde_json::to_value(AiResponse::Move { mv: Some(mv) }).unwrap(),
            json!({"move": {"to": {"r": 4, "c": 4}, "drop": "P", "promotion": "none"}})
        );
        assert_eq!(
            serde_json::to_value(AiResponse::Move { mv: None }).unwrap(),
            json!({"move": null})
        );
        assert_eq!(
            serde_json::to_value(AiResponse::from(Evaluation::Score(-35))).unwrap(),
            json!({"score": -35})
        );
        assert_eq!(
            serde_json::to_value(AiResponse::from(Evaluation::Disabled)).unwrap(),
            json!({"score": null, "disabled": true})
        );
        assert_eq!(
            serde_json::to_value(AiResponse::from(Evaluation::Unavailable {
                reason: "engine path is not configured".to_string()
            }))
            .unwrap(),
            json!({"error": "engine unavailable", "detail": "engine path is not configured"})
        );
    }
}
