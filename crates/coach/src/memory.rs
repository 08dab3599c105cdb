//! Single-slot reuse of the last analysis
//!
//! A conversation keeps asking about the same position far more often than
//! it switches positions, so one slot keyed on the canonical encoding is
//! enough to avoid redundant engine calls. One memory per conversation; no
//! internal locking.

use std::future::Future;

use tracing::debug;

use coach_core::analysis::AnalysisResult;
use coach_core::position::NormalizedPosition;

use crate::error::CoachError;

/// The most recent position and its analysis, if any.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    last: Option<(NormalizedPosition, AnalysisResult)>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the stored analysis, used when a request carries no
    /// position of its own.
    pub fn last_position(&self) -> Option<&NormalizedPosition> {
        self.last.as_ref().map(|(position, _)| position)
    }
}

/// Return the stored analysis when the canonical encoding matches exactly,
/// otherwise run `compute` and overwrite the slot with the fresh result.
pub async fn get_or_compute<F, Fut>(
    position: &NormalizedPosition,
    memory: &mut ConversationMemory,
    compute: F,
) -> Result<AnalysisResult, CoachError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<AnalysisResult, CoachError>>,
{
    if let Some((stored, result)) = &memory.last {
        if stored.encoding() == position.encoding() {
            debug!(fen = position.encoding(), "reusing cached analysis");
            return Ok(result.clone());
        }
    }

    let result = compute().await?;
    memory.last = Some((position.clone(), result.clone()));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use coach_core::analysis::{CandidateLine, SearchLimit};
    use coach_core::score::Score;

    const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    const SICILIAN_FEN: &str = "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";

    fn dummy_result(position: &NormalizedPosition) -> AnalysisResult {
        AnalysisResult {
            position: position.clone(),
            limit: SearchLimit::Depth(10),
            lines: vec![CandidateLine {
                move_uci: "e2e4".to_string(),
                score: Score::Cp(35),
                pv_uci: vec!["e2e4".to_string()],
            }],
        }
    }

    #[tokio::test]
    async fn compute_runs_once_for_an_unchanged_position() {
        let position = NormalizedPosition::parse(STARTING_FEN).unwrap();
        let mut memory = ConversationMemory::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let result = get_or_compute(&position, &mut memory, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(dummy_result(&position))
            })
            .await
            .unwrap();
            assert_eq!(result.lines.len(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            memory.last_position().unwrap().encoding(),
            position.encoding()
        );
    }

    #[tokio::test]
    async fn compute_runs_again_when_the_position_changes() {
        let first = NormalizedPosition::parse(STARTING_FEN).unwrap();
        let second = NormalizedPosition::parse(SICILIAN_FEN).unwrap();
        let mut memory = ConversationMemory::new();
        let calls = AtomicUsize::new(0);

        for position in [&first, &second] {
            get_or_compute(position, &mut memory, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(dummy_result(position))
            })
            .await
            .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // The slot now holds the newer position.
        assert_eq!(
            memory.last_position().unwrap().encoding(),
            second.encoding()
        );
    }

    #[tokio::test]
    async fn a_failed_compute_leaves_the_slot_untouched() {
        let position = NormalizedPosition::parse(STARTING_FEN).unwrap();
        let mut memory = ConversationMemory::new();

        let outcome = get_or_compute(&position, &mut memory, || async {
            Err(CoachError::EngineUnavailable("no engine".to_string()))
        })
        .await;

        assert!(outcome.is_err());
        assert!(memory.last_position().is_none());
    }
}
