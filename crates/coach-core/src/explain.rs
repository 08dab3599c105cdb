//! Rendering of analysis results into coaching text

use shakmaty::{san::San, uci::UciMove, Chess, Color, Position};

use crate::analysis::{AnalysisResult, CandidateLine};
use crate::annotate;
use crate::score::Score;

/// How much detail the rendered answer carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Short,
    Detailed,
}

/// Shown when the engine produced no usable lines. Missing engine output is
/// a degraded answer, not an error.
pub const NO_LINES_APOLOGY: &str =
    "Sorry, I could not get any analysis lines back from the engine.";

/// Plies of principal variation shown in detailed mode.
const PV_PLIES_SHOWN: usize = 6;

const CLOSING_TIP: &str = "Tip: try to understand the idea behind a move \
    (king safety, the center, piece activity) rather than memorizing it.";

/// Render an analysis into coaching text.
pub fn render(result: &AnalysisResult, verbosity: Verbosity) -> String {
    if result.lines.is_empty() {
        return NO_LINES_APOLOGY.to_string();
    }
    match verbosity {
        Verbosity::Short => render_short(result),
        Verbosity::Detailed => render_detailed(result),
    }
}

/// Human label for a mover-relative centipawn value.
pub fn cp_bucket(cp: i32) -> &'static str {
    if cp >= 200 {
        "large advantage"
    } else if cp >= 80 {
        "clear advantage"
    } else if cp >= 30 {
        "slight advantage"
    } else if cp <= -200 {
        "large disadvantage"
    } else if cp <= -80 {
        "clear disadvantage"
    } else if cp <= -30 {
        "slight disadvantage"
    } else {
        "balanced position"
    }
}

/// "+0.35", "-1.20", "mate in 3", "mated in 2". Always branches on the
/// score kind; the ordering sentinel never reaches formatting.
pub fn format_score(score: Score) -> String {
    match score {
        Score::Cp(cp) => {
            let pawns = f64::from(cp) / 100.0;
            if pawns > 0.0 {
                format!("+{pawns:.2}")
            } else {
                format!("{pawns:.2}")
            }
        }
        Score::Mate(moves) if moves > 0 => format!("mate in {moves}"),
        Score::Mate(moves) => format!("mated in {}", moves.abs()),
    }
}

fn side_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

/// Evaluation line shared by both modes. Centipawn scores carry a bucket
/// label; mate scores bypass bucketing and keep the literal phrasing.
fn evaluation_header(result: &AnalysisResult, best: &CandidateLine) -> String {
    let side = side_name(result.turn());
    match best.score {
        Score::Cp(cp) => format!(
            "Side to move: {side}. Evaluation: {} ({}).",
            format_score(best.score),
            cp_bucket(cp)
        ),
        Score::Mate(_) => format!(
            "Side to move: {side}. Evaluation: {}.",
            format_score(best.score)
        ),
    }
}

fn render_short(result: &AnalysisResult) -> String {
    let board = result.position.board();
    let best = &result.lines[0];

    let alternatives: Vec<String> = result
        .lines
        .iter()
        .skip(1)
        .take(2)
        .map(|line| san_or_uci(board, &line.move_uci))
        .collect();
    let others = if alternatives.is_empty() {
        "none".to_string()
    } else {
        alternatives.join(", ")
    };

    format!(
        "{}\nBest move: **{}**.\nOther options: {}",
        evaluation_header(result, best),
        san_or_uci(board, &best.move_uci),
        others
    )
}

fn render_detailed(result: &AnalysisResult) -> String {
    let board = result.position.board();
    let best = &result.lines[0];

    let mut out = vec![
        evaluation_header(result, best),
        String::new(),
        "Candidate moves:".to_string(),
    ];

    for (i, line) in result.lines.iter().enumerate() {
        let pv = pv_to_san(board, &line.pv_uci, PV_PLIES_SHOWN).join(" ");
        out.push(format!(
            "{}. **{}** ({}): {}. Main line: {}",
            i + 1,
            san_or_uci(board, &line.move_uci),
            format_score(line.score),
            idea_for(board, &line.move_uci),
            pv
        ));
    }

    out.push(String::new());
    out.push(CLOSING_TIP.to_string());
    out.join("\n")
}

/// SAN for a UCI move if it parses and is legal here, the raw UCI text
/// otherwise. Rendering never fails on a move the engine produced.
fn san_or_uci(board: &Chess, uci: &str) -> String {
    uci.parse::<UciMove>()
        .ok()
        .and_then(|parsed| parsed.to_move(board).ok())
        .map(|m| San::from_move(board, m).to_string())
        .unwrap_or_else(|| uci.to_string())
}

fn idea_for(board: &Chess, uci: &str) -> &'static str {
    uci.parse::<UciMove>()
        .ok()
        .and_then(|parsed| parsed.to_move(board).ok())
        .map(|m| annotate::move_idea(board, &m))
        .unwrap_or(annotate::GENERAL_IDEA)
}

/// Replay the PV on a scratch board, rendering each ply in SAN. Stops at
/// the cap or at the first move that fails to parse or is illegal in the
/// replayed position.
pub fn pv_to_san(board: &Chess, pv_uci: &[String], max_plies: usize) -> Vec<String> {
    let mut pos = board.clone();
    let mut out = Vec::new();
    for uci in pv_uci.iter().take(max_plies) {
        let Ok(parsed) = uci.parse::<UciMove>() else {
            break;
        };
        let Ok(m) = parsed.to_move(&pos) else {
            break;
        };
        out.push(San::from_move(&pos, m).to_string());
        pos.play_unchecked(m);
    }
    out
}
