//! UCI engine client (async I/O)
//!
//! One engine process per analysis call: spawn, handshake, search, tear
//! down. The read loop always runs under a wall-clock ceiling derived from
//! the search bound, so a stuck engine cannot hang the caller.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;
use tracing::debug;

use coach_core::analysis::{AnalysisResult, CandidateLine, SearchLimit};
use coach_core::position::NormalizedPosition;
use coach_core::score::Score;

use crate::config::CoachConfig;
use crate::error::CoachError;

/// Bound on the initial uci/isready handshake.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Wall-clock slack on top of the engine's own search bound.
const SEARCH_GRACE: Duration = Duration::from_secs(10);

/// Per-ply budget used to bound depth-limited searches.
const SECS_PER_DEPTH_PLY: u64 = 5;

/// How long `quit` may take before the process is killed.
const QUIT_GRACE: Duration = Duration::from_secs(2);

/// Run one analysis against a freshly spawned engine process. The process
/// is torn down before this returns, on success and on error alike.
pub async fn analyze(
    config: &CoachConfig,
    position: &NormalizedPosition,
    limit: SearchLimit,
    multipv: u32,
) -> Result<AnalysisResult, CoachError> {
    let path = config.engine_path.as_deref().ok_or_else(|| {
        CoachError::EngineUnavailable(
            "STOCKFISH_PATH is not set; point it at a UCI engine binary".to_string(),
        )
    })?;

    let mut engine = UciEngine::spawn(path).await?;
    let outcome = engine.analyse(position.encoding(), limit, multipv).await;
    engine.shutdown().await;

    Ok(AnalysisResult {
        position: position.clone(),
        limit,
        lines: outcome?,
    })
}

/// A live UCI engine process.
struct UciEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl UciEngine {
    /// Spawn the engine binary and complete the UCI handshake.
    async fn spawn(path: &str) -> Result<Self, CoachError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                CoachError::EngineUnavailable(format!("failed to spawn {path}: {e}"))
            })?;

        let stdin = process.stdin.take().unwrap();
        let stdout = BufReader::new(process.stdout.take().unwrap());

        let mut engine = Self {
            process,
            stdin,
            stdout,
        };

        match timeout(HANDSHAKE_TIMEOUT, engine.handshake()).await {
            Ok(Ok(())) => Ok(engine),
            Ok(Err(e)) => {
                engine.shutdown().await;
                Err(e)
            }
            Err(_) => {
                engine.shutdown().await;
                Err(CoachError::EngineTimeout(format!(
                    "no handshake within {}s",
                    HANDSHAKE_TIMEOUT.as_secs()
                )))
            }
        }
    }

    async fn handshake(&mut self) -> Result<(), CoachError> {
        self.send("uci").await?;
        self.wait_for("uciok").await?;

        self.send("setoption name Threads value 1").await?;
        self.send("setoption name UCI_AnalyseMode value true").await?;
        self.send("isready").await?;
        self.wait_for("readyok").await
    }

    /// Run one search and collect the ranked candidate lines.
    async fn analyse(
        &mut self,
        fen: &str,
        limit: SearchLimit,
        multipv: u32,
    ) -> Result<Vec<CandidateLine>, CoachError> {
        self.send(&format!("setoption name MultiPV value {multipv}"))
            .await?;
        self.send(&format!("position fen {fen}")).await?;
        self.send(&go_command(limit)).await?;

        let ceiling = wall_clock_ceiling(limit);
        match timeout(ceiling, self.collect_lines(multipv)).await {
            Ok(lines) => lines,
            Err(_) => Err(CoachError::EngineTimeout(format!(
                "no bestmove within {}s",
                ceiling.as_secs()
            ))),
        }
    }

    /// Read streamed `info` records into per-multipv slots until the
    /// `bestmove` marker. The latest record per slot wins; records without
    /// a usable score or principal variation are ignored.
    async fn collect_lines(&mut self, multipv: u32) -> Result<Vec<CandidateLine>, CoachError> {
        let mut slots: Vec<Option<CandidateLine>> = vec![None; multipv as usize];
        let mut line = String::new();

        loop {
            line.clear();
            let read = self
                .stdout
                .read_line(&mut line)
                .await
                .map_err(|e| CoachError::EngineProtocol(format!("read from engine failed: {e}")))?;
            if read == 0 {
                return Err(CoachError::EngineProtocol(
                    "engine stream ended before bestmove".to_string(),
                ));
            }

            let trimmed = line.trim();
            debug!(line = trimmed, "engine >");

            if trimmed.starts_with("bestmove") {
                break;
            }

            if let Some(info) = parse_info_line(trimmed) {
                let slot = (info.multipv - 1) as usize;
                if slot < slots.len() {
                    slots[slot] = Some(info.into_candidate());
                }
            }
        }

        // Slot order is the engine's rank order; empty slots drop out.
        Ok(slots.into_iter().flatten().collect())
    }

    async fn send(&mut self, cmd: &str) -> Result<(), CoachError> {
        debug!(cmd, "engine <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| CoachError::EngineProtocol(format!("write to engine failed: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| CoachError::EngineProtocol(format!("flush to engine failed: {e}")))?;
        Ok(())
    }

    async fn wait_for(&mut self, expected: &str) -> Result<(), CoachError> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .stdout
                .read_line(&mut line)
                .await
                .map_err(|e| CoachError::EngineProtocol(format!("read from engine failed: {e}")))?;
            if read == 0 {
                return Err(CoachError::EngineProtocol(format!(
                    "engine stream ended while waiting for {expected}"
                )));
            }
            let trimmed = line.trim();
            debug!(line = trimmed, "engine >");
            if trimmed == expected {
                return Ok(());
            }
        }
    }

    /// Graceful quit, then kill if the process does not exit in time.
    async fn shutdown(&mut self) {
        let _ = self.send("quit").await;
        if timeout(QUIT_GRACE, self.process.wait()).await.is_err() {
            let _ = self.process.start_kill();
            let _ = self.process.wait().await;
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill so no process leaks on early returns
        let _ = self.process.start_kill();
    }
}

fn go_command(limit: SearchLimit) -> String {
    match limit {
        SearchLimit::Depth(depth) => format!("go depth {depth}"),
        SearchLimit::MoveTime(ms) => format!("go movetime {ms}"),
    }
}

fn wall_clock_ceiling(limit: SearchLimit) -> Duration {
    let bound = match limit {
        SearchLimit::Depth(depth) => Duration::from_secs(u64::from(depth) * SECS_PER_DEPTH_PLY),
        SearchLimit::MoveTime(ms) => Duration::from_millis(ms),
    };
    bound + SEARCH_GRACE
}

/// One parsed `info ... multipv ... score ... pv ...` record.
struct InfoLine {
    multipv: u32,
    score: Score,
    pv: Vec<String>,
}

impl InfoLine {
    fn into_candidate(self) -> CandidateLine {
        CandidateLine {
            move_uci: self.pv[0].clone(),
            score: self.score,
            pv_uci: self.pv,
        }
    }
}

/// Parse an `info` record. Returns `None` for anything that is not an info
/// line or that lacks a usable score or principal variation; such records
/// are tolerated and skipped, never surfaced as partial results.
fn parse_info_line(line: &str) -> Option<InfoLine> {
    if !line.starts_with("info") {
        return None;
    }

    let score = Score::from_uci(parse_field(line, "cp"), parse_field(line, "mate"))?;
    let pv = parse_pv(line);
    if pv.is_empty() {
        return None;
    }

    // Single-line searches usually omit the multipv token.
    let multipv = parse_field(line, "multipv")
        .filter(|idx| *idx >= 1)
        .unwrap_or(1) as u32;

    Some(InfoLine { multipv, score, pv })
}

/// Value of a `<key> <int>` pair anywhere in the record.
fn parse_field(line: &str, key: &str) -> Option<i32> {
    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == key {
            return tokens.next()?.parse().ok();
        }
    }
    None
}

/// Moves after the `pv` token, up to the end of the record or an engine
/// annex like `string`.
fn parse_pv(line: &str) -> Vec<String> {
    line.split_whitespace()
        .skip_while(|token| *token != "pv")
        .skip(1)
        .take_while(|token| *token != "string" && !token.starts_with("bmc"))
        .map(str::to_string)
        .collect()
}
