//! Analysis data model shared between the engine client and the renderer

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::position::NormalizedPosition;
use crate::score::Score;

/// Search bound for one engine call. Depth and wall-clock time are mutually
/// exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLimit {
    /// Plies of search depth.
    Depth(u32),
    /// Wall-clock budget in milliseconds.
    MoveTime(u64),
}

/// One ranked engine suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateLine {
    /// First move of the line in UCI notation.
    pub move_uci: String,
    /// Score from the point of view of the side to move.
    pub score: Score,
    /// Principal variation in UCI notation, starting with `move_uci`.
    pub pv_uci: Vec<String>,
}

/// Engine output for one analyzed position.
///
/// `lines` keeps the engine's rank order (best first); nothing downstream
/// re-sorts it.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub position: NormalizedPosition,
    pub limit: SearchLimit,
    pub lines: Vec<CandidateLine>,
}

impl AnalysisResult {
    /// Side to move in the analyzed position.
    pub fn turn(&self) -> Color {
        self.position.turn()
    }
}
