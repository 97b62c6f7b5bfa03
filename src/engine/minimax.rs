use crate::engine::config::EngineConfig;
use crate::engine::{SearchStats, Searcher};
use crate::logic::game::GameState;
use crate::logic::position::Position;
use crate::logic::record::Move;
use std::sync::Arc;
use std::time::Instant;

/// Exhaustive fixed-depth minimax over capture values.
///
/// Every edge of the tree weighs the value of the piece it captures, positive
/// for the root side and negative for the opponent. A node is worth its
/// incoming edge plus the best (for the side to move) of its children. There
/// is no pruning and no static evaluation beyond captured material.
pub struct MinMaxEngine {
    config: Arc<EngineConfig>,
    nodes_searched: u32,
}

impl MinMaxEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            config,
            nodes_searched: 0,
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.config = config;
    }

    /// Searches `game_state` at the configured depth.
    pub fn best_move(&mut self, game_state: &GameState) -> Option<(Move, SearchStats)> {
        let depth = self.config.depth;
        self.search(game_state, depth)
    }

    /// Each root move with its value. `depth` counts the root move itself,
    /// so depths 0 and 1 both score captures on the next ply only.
    pub fn score_moves(&mut self, position: &Position, depth: u8) -> Vec<(Move, i64)> {
        position
            .legal_moves()
            .into_iter()
            .map(|mv| {
                let score = self.edge_value(position, &mv, depth.saturating_sub(1), true);
                (mv, score)
            })
            .collect()
    }

    /// First move attaining the maximum score, `None` without legal moves.
    pub fn select_move(&mut self, position: &Position, depth: u8) -> Option<Move> {
        let mut best: Option<(Move, i64)> = None;
        for (mv, score) in self.score_moves(position, depth) {
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
        }
        best.map(|(mv, _)| mv)
    }

    /// Weight of `mv` played by the side to move in `position`, plus the
    /// value of the subtree `depth` plies below it.
    fn edge_value(&mut self, position: &Position, mv: &Move, depth: u8, maximizing: bool) -> i64 {
        self.nodes_searched = self.nodes_searched.saturating_add(1);
        let child = position.play(mv);
        let captured = child
            .history
            .last()
            .and_then(|record| record.captured)
            .map_or(0, |piece| self.config.piece_value(piece.piece_type));
        let weight = if maximizing { captured } else { -captured };

        weight + self.node_value(&child, depth, !maximizing)
    }

    fn node_value(&mut self, position: &Position, depth: u8, maximizing: bool) -> i64 {
        if depth == 0 {
            return 0;
        }

        let values = position
            .legal_moves()
            .iter()
            .map(|mv| self.edge_value(position, mv, depth - 1, maximizing))
            .collect::<Vec<_>>();

        let best = if maximizing {
            values.into_iter().max()
        } else {
            values.into_iter().min()
        };
        best.unwrap_or(0)
    }
}

impl Searcher for MinMaxEngine {
    fn search(&mut self, game_state: &GameState, depth: u8) -> Option<(Move, SearchStats)> {
        if game_state.pending_promotion().is_some() {
            return None;
        }

        let start = Instant::now();
        self.nodes_searched = 0;
        let position = game_state.snapshot();
        let mv = self.select_move(&position, depth)?;

        let stats = SearchStats {
            depth,
            nodes: self.nodes_searched,
            time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        log::trace!(
            "minimax picked {mv} at depth {} after {} nodes in {}ms",
            stats.depth,
            stats.nodes,
            stats.time_ms
        );
        Some((mv, stats))
    }
}
