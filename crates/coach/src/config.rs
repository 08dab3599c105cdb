//! Coach configuration from environment variables
//!
//! Nothing here fails at startup. In particular a missing engine path only
//! surfaces when the first analysis is attempted.

use std::env;

/// Settings for the optional text-generation backend.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    /// Empty key means the backend is disabled.
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl LlmConfig {
    pub fn enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4.1-mini".to_string(),
            max_tokens: 600,
            temperature: 0.6,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CoachConfig {
    /// Path to a UCI engine binary. Checked on first use, not at load time.
    pub engine_path: Option<String>,

    /// Search depth when the request does not carry one.
    pub default_depth: u32,

    /// Candidate lines requested per analysis.
    pub default_multipv: u32,

    /// Wall-clock search budget; when set it replaces the depth bound.
    pub default_movetime_ms: Option<u64>,

    pub llm: LlmConfig,
}

impl CoachConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Self {
        let engine_path = env::var("STOCKFISH_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty());

        let default_depth = env::var("STOCKFISH_DEPTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(14);

        let default_multipv = env::var("STOCKFISH_MULTIPV")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        // Seconds as a float, 0 disables the time bound (depth applies).
        let default_movetime_ms = env::var("STOCKFISH_TIME")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|secs| *secs > 0.0)
            .map(|secs| (secs * 1000.0) as u64);

        let llm = LlmConfig {
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string()),
            max_tokens: env::var("OPENAI_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            temperature: env::var("OPENAI_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.6),
        };

        Self {
            engine_path,
            default_depth,
            default_multipv,
            default_movetime_ms,
            llm,
        }
    }
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            engine_path: None,
            default_depth: 14,
            default_multipv: 3,
            default_movetime_ms: None,
            llm: LlmConfig::default(),
        }
    }
}
