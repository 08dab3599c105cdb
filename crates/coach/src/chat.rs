//! Chat orchestration: position in, coaching text out

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use coach_core::analysis::SearchLimit;
use coach_core::explain::{self, Verbosity};
use coach_core::position::NormalizedPosition;

use crate::config::CoachConfig;
use crate::engine;
use crate::error::CoachError;
use crate::llm::{self, LlmOutcome};
use crate::memory::{self, ConversationMemory};

/// One inbound question from the front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    /// Raw FEN; when absent the remembered position applies.
    pub fen: Option<String>,
    pub mode: Verbosity,
    pub depth: Option<u32>,
    pub multipv: Option<u32>,
}

/// Answer when neither the request nor the memory carries a position.
/// An onboarding message, not an error.
pub const NO_POSITION_HELP: &str = "I can only answer questions about a concrete \
    position for now. Provide a FEN first, then ask again.";

/// Answer a question about a position, reusing the cached analysis when the
/// position has not changed since the last call on this memory.
pub async fn generate_answer(
    config: &CoachConfig,
    request: &ChatRequest,
    memory: &mut ConversationMemory,
) -> Result<String, CoachError> {
    let raw_fen = request
        .fen
        .as_deref()
        .map(str::trim)
        .filter(|fen| !fen.is_empty());

    let position = match raw_fen {
        Some(raw) => NormalizedPosition::parse(raw)?,
        None => match memory.last_position() {
            Some(stored) => stored.clone(),
            None => return Ok(NO_POSITION_HELP.to_string()),
        },
    };

    // A depth on the request wins; otherwise a configured time budget
    // replaces the configured default depth.
    let limit = match (request.depth, config.default_movetime_ms) {
        (Some(depth), _) => SearchLimit::Depth(depth),
        (None, Some(ms)) => SearchLimit::MoveTime(ms),
        (None, None) => SearchLimit::Depth(config.default_depth),
    };
    let multipv = request.multipv.unwrap_or(config.default_multipv).max(1);

    let result = memory::get_or_compute(&position, memory, || {
        info!(fen = position.encoding(), ?limit, multipv, "running engine analysis");
        engine::analyze(config, &position, limit, multipv)
    })
    .await?;

    match llm::generate(&config.llm, &request.question, position.encoding(), &result.lines).await
    {
        LlmOutcome::Text(text) => Ok(text),
        LlmOutcome::NotConfigured => Ok(explain::render(&result, request.mode)),
        LlmOutcome::Failed(reason) => {
            debug!(reason = %reason, "text backend unavailable, rendering locally");
            Ok(explain::render(&result, request.mode))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use coach_core::analysis::{AnalysisResult, CandidateLine};
    use coach_core::score::Score;

    const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn request(fen: Option<&str>, mode: Verbosity) -> ChatRequest {
        ChatRequest {
            question: "What is the plan here?".to_string(),
            fen: fen.map(str::to_string),
            mode,
            depth: None,
            multipv: None,
        }
    }

    // Seed through the public cache path so the slot layout stays private.
    async fn seeded_memory(fen: &str) -> ConversationMemory {
        let position = NormalizedPosition::parse(fen).unwrap();
        let result = AnalysisResult {
            position: position.clone(),
            limit: SearchLimit::Depth(10),
            lines: vec![
                CandidateLine {
                    move_uci: "e2e4".to_string(),
                    score: Score::Cp(35),
                    pv_uci: vec!["e2e4".to_string(), "e7e5".to_string()],
                },
                CandidateLine {
                    move_uci: "g1f3".to_string(),
                    score: Score::Cp(20),
                    pv_uci: vec!["g1f3".to_string()],
                },
            ],
        };
        let mut memory = ConversationMemory::new();
        memory::get_or_compute(&position, &mut memory, || async { Ok(result) })
            .await
            .unwrap();
        memory
    }

    #[tokio::test]
    async fn no_position_anywhere_yields_the_onboarding_answer() {
        let config = CoachConfig::default();
        let mut memory = ConversationMemory::new();
        let answer = generate_answer(&config, &request(None, Verbosity::Short), &mut memory)
            .await
            .unwrap();
        assert_eq!(answer, NO_POSITION_HELP);
    }

    #[tokio::test]
    async fn invalid_fen_is_surfaced_as_invalid_position() {
        let config = CoachConfig::default();
        let mut memory = ConversationMemory::new();
        let err = generate_answer(
            &config,
            &request(Some("totally not a fen"), Verbosity::Short),
            &mut memory,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoachError::InvalidPosition(_)));
    }

    #[tokio::test]
    async fn unchanged_position_is_answered_from_the_cache() {
        // No engine configured: a cache miss would fail, so a successful
        // answer proves the cached analysis was reused.
        let config = CoachConfig::default();
        let mut memory = seeded_memory(STARTING_FEN).await;

        let answer = generate_answer(
            &config,
            &request(Some(STARTING_FEN), Verbosity::Short),
            &mut memory,
        )
        .await
        .unwrap();
        assert!(answer.contains("Best move: **e4**."));
        assert!(answer.contains("slight advantage"));
    }

    #[tokio::test]
    async fn missing_request_fen_falls_back_to_the_remembered_position() {
        let config = CoachConfig::default();
        let mut memory = seeded_memory(STARTING_FEN).await;

        let answer = generate_answer(&config, &request(None, Verbosity::Detailed), &mut memory)
            .await
            .unwrap();
        assert!(answer.contains("Candidate moves:"));
    }

    #[tokio::test]
    async fn changed_position_without_an_engine_fails_as_unavailable() {
        let config = CoachConfig::default();
        let mut memory = seeded_memory(STARTING_FEN).await;

        let err = generate_answer(
            &config,
            &request(
                Some("rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"),
                Verbosity::Short,
            ),
            &mut memory,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoachError::EngineUnavailable(_)));
    }
}
