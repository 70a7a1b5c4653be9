//! Routes move and evaluation requests to the external engine, with local
//! search as the fallback for moves.

use crate::config::BridgeConfig;
use crate::engine::EngineBridge;
use crate::request::{AiRequest, AiResponse, Evaluation, Mode};
use shogi_core::Move;
use shogi_engine::{build_legal_moves, Position};
use shogi_minimax::{SearchConfig, Searcher};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Chooses moves and scores positions for the caller.
pub struct MoveOrchestrator {
    config: BridgeConfig,
    bridge: EngineBridge,
    search: SearchConfig,
}

impl MoveOrchestrator {
    pub fn new(config: BridgeConfig) -> Self {
        MoveOrchestrator {
            bridge: EngineBridge::new(&config),
            config,
            search: SearchConfig::default(),
        }
    }

    /// Replaces the local search settings. Depth and budget still come from
    /// each request.
    pub fn with_search_config(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Handles one request.
    pub async fn handle(&self, request: &AiRequest) -> AiResponse {
        match request.mode {
            Mode::Bestmove => AiResponse::Move {
                mv: self
                    .choose_move(&request.position, request.depth, request.time_ms)
                    .await,
            },
            Mode::Evaluate => self
                .evaluate(&request.position, request.depth, request.time_ms)
                .await
                .into(),
        }
    }

    /// Picks a move for the side to move, or `None` if it has none.
    ///
    /// The engine is asked first when one is configured. Any failure, a
    /// missing answer, or an answer that is not legal here falls back to
    /// local search.
    pub async fn choose_move(&self, position: &Position, depth: u32, time_ms: u64) -> Option<Move> {
        let legal = build_legal_moves(position, position.side_to_move);
        if legal.is_empty() {
            debug!("no legal moves");
            return None;
        }

        if self.config.engine_path.is_some() {
            match self.bridge.select_move(position, depth, time_ms).await {
                Ok(Some(mv)) if legal.contains(&mv) => {
                    info!(%mv, "engine move");
                    return Some(mv);
                }
                Ok(Some(mv)) => warn!(%mv, "engine move is not legal, searching locally"),
                Ok(None) => warn!("engine gave no move, searching locally"),
                Err(failure) => {
                    warn!(error = %failure, detail = %failure.detail(), "engine failed, searching locally")
                }
            }
        }

        self.search_locally(*position, depth, time_ms).await
    }

    /// Scores the position with the engine. Never falls back to a local
    /// score.
    pub async fn evaluate(&self, position: &Position, depth: u32, time_ms: u64) -> Evaluation {
        if !self.config.eval_enabled {
            return Evaluation::Disabled;
        }
        match self.bridge.evaluate(position, depth, time_ms).await {
            Ok(score) => Evaluation::Score(score),
            Err(failure) => {
                warn!(error = %failure, "evaluation unavailable");
                Evaluation::Unavailable {
                    reason: failure.detail(),
                }
            }
        }
    }

    async fn search_locally(&self, position: Position, depth: u32, time_ms: u64) -> Option<Move> {
        let config = SearchConfig {
            max_depth: depth.max(1),
            time_budget: Duration::from_millis(time_ms),
            ..self.search.clone()
        };
        let task = tokio::task::spawn_blocking(move || Searcher::new(config).choose_move(&position));
        match task.await {
            Ok(mv) => mv,
            Err(e) => {
                warn!("local search task failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shogi_engine::Game;

    #[tokio::test]
    async fn unconfigured_select_searches_locally() {
        let orchestrator = MoveOrchestrator::new(BridgeConfig::default());
        let pos = Position::startpos();
        let mv = orchestrator.choose_move(&pos, 1, 200).await.unwrap();
        assert!(build_legal_moves(&pos, pos.side_to_move).contains(&mv));
    }

    #[tokio::test]
    async fn unconfigured_evaluate_is_unavailable() {
        let config = BridgeConfig {
            eval_enabled: true,
            ..Default::default()
        };
        let orchestrator = MoveOrchestrator::new(config);
        let eval = orchestrator.evaluate(&Position::startpos(), 5, 1000).await;
        assert_eq!(
            eval,
            Evaluation::Unavailable {
                reason: "engine path is not configured".to_string()
            }
        );
    }

    #[tokio::test]
    async fn disabled_evaluate_never_spawns() {
        let config = BridgeConfig {
            engine_path: Some("/nonexistent/engine".into()),
            eval_enabled: false,
            ..Default::default()
        };
        let orchestrator = MoveOrchestrator::new(config);
        assert_eq!(
            orchestrator.evaluate(&Position::startpos(), 5, 1000).await,
            Evaluation::Disabled
        );
    }

    #[tokio::test]
    async fn missing_executable_falls_back() {
        let config = BridgeConfig {
            engine_path: Some("/nonexistent/engine".into()),
            ..Default::default()
        };
        let orchestrator = MoveOrchestrator::new(config);
        assert!(orchestrator
            .choose_move(&Position::startpos(), 1, 200)
            .await
            .is_some());
    }

    #[tokio::test]
    async fn mated_side_gets_no_move() {
        let mut game = Game::from_sfen("4k4/9/4P4/9/9/9/9/9/4K4 b G 1").unwrap();
        game.make_move_usi("G*5b").unwrap();
        let orchestrator = MoveOrchestrator::new(BridgeConfig::default());
        assert_eq!(orchestrator.choose_move(game.position(), 3, 500).await, None);
    }

    #[tokio::test]
    async fn handle_dispatches_on_mode() {
        let orchestrator = MoveOrchestrator::new(BridgeConfig::default());
        let mut request = AiRequest::bestmove(Position::startpos());
        request.depth = 1;
        assert!(matches!(
            orchestrator.handle(&request).await,
            AiResponse::Move { mv: Some(_) }
        ));
        let request = AiRequest::evaluate(Position::startpos());
        assert_eq!(
            orchestrator.handle(&request).await,
            AiResponse::Disabled {
                score: None,
                disabled: true
            }
        );
    }
}
