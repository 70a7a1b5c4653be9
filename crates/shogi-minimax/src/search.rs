//! Alpha-beta search with iterative deepening.

use crate::eval::{evaluate, sum_material, EvalWeights};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use shogi_core::{Move, Owner};
use shogi_engine::{build_legal_moves, is_in_check, MoveList, Position};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Score of a mated side, from the winner's point of view.
pub const MATE_SCORE: f64 = 10_000.0;

/// Root scores closer than this are treated as equal.
const TIE_EPSILON: f64 = 1e-9;

/// Search limits and tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Deepest iteration to run.
    pub max_depth: u32,
    /// Wall-clock budget for one `choose_move` call.
    #[serde(with = "millis")]
    pub time_budget: Duration,
    /// Added to checking root moves once material runs low.
    pub endgame_bonus: f64,
    /// Non-King material at or below which the endgame bonus applies.
    pub endgame_material_threshold: f64,
    pub weights: EvalWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 5,
            time_budget: Duration::from_millis(1000),
            endgame_bonus: 0.5,
            endgame_material_threshold: 24.0,
            weights: EvalWeights::default(),
        }
    }
}

impl SearchConfig {
    /// Config with the given depth and budget and default weights.
    pub fn with_limits(max_depth: u32, time_budget: Duration) -> Self {
        SearchConfig {
            max_depth,
            time_budget,
            ..SearchConfig::default()
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Statistics for one completed iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchInfo {
    pub depth: u32,
    /// Best root score from the mover's point of view.
    pub score: f64,
    /// Nodes visited so far in this `choose_move` call.
    pub nodes: u64,
    pub elapsed: Duration,
    pub best_move: Move,
}

/// Search state.
pub struct Searcher {
    config: SearchConfig,
    rng: StdRng,
    nodes: u64,
}

impl Searcher {
    /// Creates a searcher seeded from the operating system.
    pub fn new(config: SearchConfig) -> Self {
        Searcher {
            config,
            rng: StdRng::from_os_rng(),
            nodes: 0,
        }
    }

    /// Creates a searcher with a fixed tie-break seed.
    pub fn with_seed(config: SearchConfig, seed: u64) -> Self {
        Searcher {
            config,
            rng: StdRng::seed_from_u64(seed),
            nodes: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Minimax with alpha-beta pruning. `maximizing` is true when the side
    /// to move is the second side; scores are always second-side positive.
    pub fn search(
        &mut self,
        position: &Position,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> f64 {
        self.nodes += 1;

        if depth == 0 {
            return evaluate(position, &self.config.weights);
        }

        let mover = position.side_to_move;
        let mut moves = build_legal_moves(position, mover);
        if moves.is_empty() {
            if !is_in_check(&position.board, mover) {
                return 0.0;
            }
            return match mover {
                Owner::Second => -MATE_SCORE,
                Owner::First => MATE_SCORE,
            };
        }
        order_moves(position, &mut moves, &self.config.weights);

        if maximizing {
            let mut best = f64::NEG_INFINITY;
            for &m in &moves {
                let child = position.apply_move(m);
                let score = self.search(&child, depth - 1, alpha, beta, false);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for &m in &moves {
                let child = position.apply_move(m);
                let score = self.search(&child, depth - 1, alpha, beta, true);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }

    /// Picks a move for the side to move, or `None` if it has no legal move.
    pub fn choose_move(&mut self, position: &Position) -> Option<Move> {
        self.choose_move_with(position, |_| {})
    }

    /// Like [`Searcher::choose_move`], reporting each completed depth to
    /// `on_depth`.
    pub fn choose_move_with(
        &mut self,
        position: &Position,
        mut on_depth: impl FnMut(&SearchInfo),
    ) -> Option<Move> {
        let start = Instant::now();
        let deadline = start + self.config.time_budget;
        self.nodes = 0;

        let mover = position.side_to_move;
        let mut root = build_legal_moves(position, mover);
        if root.is_empty() {
            debug!(side = ?mover, "no legal moves at root");
            return None;
        }
        order_moves(position, &mut root, &self.config.weights);

        let endgame = sum_material(position, &self.config.weights)
            <= self.config.endgame_material_threshold;
        let perspective = mover.sign();
        let mut best: Option<Move> = None;

        'depths: for depth in 1..=self.config.max_depth {
            if Instant::now() >= deadline {
                break;
            }

            let mut scored = Vec::with_capacity(root.len());
            for &m in &root {
                if Instant::now() >= deadline {
                    debug!(depth, "deadline hit, discarding partial iteration");
                    break 'depths;
                }
                let child = position.apply_move(m);
                let raw = self.search(
                    &child,
                    depth - 1,
                    f64::NEG_INFINITY,
                    f64::INFINITY,
                    child.side_to_move == Owner::Second,
                );
                let mut score = raw * perspective;
                if endgame && gives_check(position, m) {
                    score += self.config.endgame_bonus;
                }
                scored.push((m, score));
            }

            let top = scored
                .iter()
                .map(|&(_, s)| s)
                .fold(f64::NEG_INFINITY, f64::max);
            let candidates: Vec<Move> = scored
                .iter()
                .filter(|&&(_, s)| (s - top).abs() <= TIE_EPSILON)
                .map(|&(m, _)| m)
                .collect();
            let Some(&pick) = candidates.choose(&mut self.rng) else {
                break;
            };
            best = Some(pick);

            let info = SearchInfo {
                depth,
                score: top,
                nodes: self.nodes,
                elapsed: start.elapsed(),
                best_move: pick,
            };
            debug!(
                depth,
                score = top,
                nodes = self.nodes,
                ties = candidates.len(),
                best = %pick,
                "depth complete"
            );
            on_depth(&info);
        }

        let chosen = best.unwrap_or(root[0]);
        info!(
            side = ?mover,
            chosen = %chosen,
            nodes = self.nodes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            completed = best.is_some(),
            "move chosen"
        );
        Some(chosen)
    }
}

/// Returns true if playing `m` attacks the opponent's King.
pub fn gives_check(position: &Position, m: Move) -> bool {
    let mover = position.side_to_move;
    let after = position.apply_move(m);
    is_in_check(&after.board, mover.opposite())
}

/// Value of the piece `m` captures, or 0.
fn capture_value(position: &Position, m: Move, weights: &EvalWeights) -> f64 {
    match m {
        Move::Board { to, .. } => position
            .board
            .get(to)
            .map_or(0.0, |p| weights.material.get(p.kind)),
        Move::Drop { .. } => 0.0,
    }
}

/// Sorts checking moves first, then by captured value, highest first.
/// Equal keys keep generation order.
pub fn order_moves(position: &Position, moves: &mut MoveList, weights: &EvalWeights) {
    let mut keyed: Vec<(bool, f64, Move)> = moves
        .as_slice()
        .iter()
        .map(|&m| (gives_check(position, m), capture_value(position, m, weights), m))
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.total_cmp(&a.1)));
    moves.clear();
    moves.extend(keyed.into_iter().map(|(_, _, m)| m));
}

/// One-shot search with a fresh OS-seeded searcher.
pub fn choose_move(position: &Position, config: SearchConfig) -> Option<Move> {
    Searcher::new(config).choose_move(position)
}
