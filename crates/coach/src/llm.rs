//! Optional text-generation backend
//!
//! The interface is stable but the API call is deliberately not wired up;
//! the orchestrator treats every outcome explicitly, so a failing or
//! disabled backend silently selects the local renderer instead.

use coach_core::analysis::CandidateLine;

use crate::config::LlmConfig;

/// Candidate lines included in a prompt.
const PROMPT_LINES: usize = 3;

/// Plies of principal variation kept per prompted line.
const PROMPT_PV_PLIES: usize = 10;

/// What came back from the backend. Never an error type: the caller always
/// has a rendering fallback and these outcomes must not propagate past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmOutcome {
    /// The backend produced an answer.
    Text(String),
    /// Backend disabled (no API key); use the local renderer.
    NotConfigured,
    /// Backend configured but the call failed; fall back and log.
    Failed(String),
}

/// Ask the backend for a free-text answer.
pub async fn generate(
    config: &LlmConfig,
    question: &str,
    fen: &str,
    lines: &[CandidateLine],
) -> LlmOutcome {
    if !config.enabled() {
        return LlmOutcome::NotConfigured;
    }

    let _prompt = build_prompt(question, fen, lines);

    // TODO: wire up the chat-completion call with config.model,
    // config.max_tokens and config.temperature once an HTTP client lands.
    LlmOutcome::Failed("text-generation backend not implemented".to_string())
}

/// Coaching prompt: instructions, the user's question, the position, and a
/// compact structured summary of the engine's top lines.
pub fn build_prompt(question: &str, fen: &str, lines: &[CandidateLine]) -> String {
    let mut parts = vec![
        "You are a patient chess coach. Answer clearly, step by step.".to_string(),
        "Do not just give the best move: explain the ideas (plans, threats, king safety)."
            .to_string(),
        "If you are unsure, say so. Never invent impossible variations.".to_string(),
        String::new(),
        "User question:".to_string(),
        question.trim().to_string(),
    ];

    if !fen.is_empty() {
        parts.push(String::new());
        parts.push("Position (FEN):".to_string());
        parts.push(fen.to_string());
    }

    if !lines.is_empty() {
        let compact: Vec<CandidateLine> = lines
            .iter()
            .take(PROMPT_LINES)
            .map(|line| CandidateLine {
                move_uci: line.move_uci.clone(),
                score: line.score,
                pv_uci: line.pv_uci.iter().take(PROMPT_PV_PLIES).cloned().collect(),
            })
            .collect();
        parts.push(String::new());
        parts.push("Engine analysis (structured):".to_string());
        parts.push(serde_json::to_string(&compact).unwrap_or_default());
    }

    parts.join("\n")
}
