//! Normalized engine scores
//!
//! UCI engines report either a centipawn evaluation or a forced-mate
//! distance, both relative to the side to move. The two shapes stay a tagged
//! union all the way to formatting; only ordering collapses them onto one
//! axis, and that sentinel value never reaches any output.

use serde::{Deserialize, Serialize};

/// Slot mate scores above/below every centipawn value when a single
/// comparison axis is needed. Internal only.
const MATE_ORDERING_CP: i32 = 100_000;

/// Engine evaluation from the point of view of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Score {
    /// Centipawns; positive means the side to move is better.
    Cp(i32),
    /// Moves until forced mate; positive means the side to move mates.
    Mate(i32),
}

impl Score {
    /// Select the score variant from the raw UCI `cp`/`mate` fields.
    ///
    /// A mate distance wins over a centipawn value when both were seen on
    /// the same record; neither present means the record carries no usable
    /// score.
    pub fn from_uci(cp: Option<i32>, mate: Option<i32>) -> Option<Self> {
        match (mate, cp) {
            (Some(moves), _) => Some(Score::Mate(moves)),
            (None, Some(cp)) => Some(Score::Cp(cp)),
            (None, None) => None,
        }
    }

    /// Collapse onto a centipawn-like axis for comparisons across kinds:
    /// any mate for the mover sorts above any centipawn score, sooner mates
    /// above later ones, mirrored for mates against the mover.
    pub fn ordering_cp(&self) -> i32 {
        match *self {
            Score::Cp(cp) => cp,
            Score::Mate(moves) if moves >= 0 => MATE_ORDERING_CP - moves,
            Score::Mate(moves) => -MATE_ORDERING_CP - moves,
        }
    }

    pub fn is_mate(&self) -> bool {
        matches!(self, Score::Mate(_))
    }
}
