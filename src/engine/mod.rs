use crate::logic::game::GameState;
use crate::logic::record::Move;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod minimax;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
}

pub trait Searcher {
    /// Picks a move for the side to move. `None` when there is nothing to
    /// play or a promotion is still pending.
    fn search(&mut self, game_state: &GameState, depth: u8) -> Option<(Move, SearchStats)>;
}
