//! Interactive coaching CLI
//!
//! Stand-in for a chat front-end: one conversation memory, questions read
//! line by line from stdin, answers printed to stdout. A position is set
//! with `--fen` at startup or `fen <FEN>` at the prompt.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use coach::chat::{generate_answer, ChatRequest};
use coach::config::CoachConfig;
use coach::coach_core::explain::Verbosity;
use coach::error::CoachError;
use coach::memory::ConversationMemory;

struct CliOptions {
    fen: Option<String>,
    mode: Verbosity,
    depth: Option<u32>,
    multipv: Option<u32>,
}

/// Parse --fen/--mode/--depth/--multipv from CLI args
fn parse_options() -> CliOptions {
    let args: Vec<String> = std::env::args().collect();
    let mut options = CliOptions {
        fen: None,
        mode: Verbosity::Detailed,
        depth: None,
        multipv: None,
    };

    for i in 0..args.len() {
        match args[i].as_str() {
            "--fen" => options.fen = args.get(i + 1).cloned(),
            "--mode" => {
                if let Some(mode) = args.get(i + 1).and_then(|v| parse_mode(v)) {
                    options.mode = mode;
                }
            }
            "--depth" => options.depth = args.get(i + 1).and_then(|v| v.parse().ok()),
            "--multipv" => options.multipv = args.get(i + 1).and_then(|v| v.parse().ok()),
            _ => {}
        }
    }

    options
}

fn parse_mode(value: &str) -> Option<Verbosity> {
    match value {
        "short" => Some(Verbosity::Short),
        "detailed" => Some(Verbosity::Detailed),
        _ => None,
    }
}

/// Map pipeline errors onto phrasing a chat user can act on.
fn friendly_error(err: &CoachError) -> String {
    match err {
        CoachError::InvalidPosition(e) => {
            format!("That position does not look valid: {e}.")
        }
        CoachError::EngineUnavailable(e) => format!(
            "The analysis engine is not available ({e}). \
             Check STOCKFISH_PATH in your environment or .env file."
        ),
        CoachError::EngineProtocol(_) => {
            "The analysis failed unexpectedly. Please try again.".to_string()
        }
        CoachError::EngineTimeout(_) => {
            "The analysis timed out. Try again with a lower depth.".to_string()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    // Load .env for local setups
    let _ = dotenvy::dotenv();

    let config = CoachConfig::load();
    info!(
        engine = config.engine_path.as_deref().unwrap_or("<unset>"),
        depth = config.default_depth,
        multipv = config.default_multipv,
        "Coach config loaded"
    );

    let options = parse_options();
    let mut current_fen = options.fen.clone();
    let mut mode = options.mode;
    let mut memory = ConversationMemory::new();

    println!("Chess coach. Ask a question, or use:");
    println!("  fen <FEN>              set the position to discuss");
    println!("  mode short|detailed    switch answer verbosity");
    println!("  quit                   leave");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }
        if let Some(rest) = input.strip_prefix("fen ") {
            current_fen = Some(rest.to_string());
            println!("Position noted. Ask away.");
            continue;
        }
        if let Some(rest) = input.strip_prefix("mode ") {
            match parse_mode(rest.trim()) {
                Some(parsed) => {
                    mode = parsed;
                    println!("Mode set to {rest}.");
                }
                None => println!("Unknown mode {rest}; use short or detailed."),
            }
            continue;
        }

        let request = ChatRequest {
            question: input.to_string(),
            fen: current_fen.clone(),
            mode,
            depth: options.depth,
            multipv: options.multipv,
        };

        match generate_answer(&config, &request, &mut memory).await {
            Ok(answer) => println!("\n{answer}\n"),
            Err(err) => println!("\n{}\n", friendly_error(&err)),
        }
    }

    Ok(())
}
