//! Rule-based one-line move ideas
//!
//! A fixed cascade of predicate/label pairs; the first match wins, so a
//! capturing check reads as a check. This is a static heuristic over the
//! board, never a search.

use shakmaty::{Chess, Color, File, Move, Position, Rank, Role};

type Predicate = fn(&Chess, &Move) -> bool;

const RULES: &[(Predicate, &str)] = &[
    (gives_check, "pressures the opposing king (check)"),
    (is_capture, "wins material or simplifies (capture)"),
    (is_castling, "secures the king and connects the rooks (castling)"),
    (develops_minor_piece, "develops a piece and improves activity"),
    (central_pawn_push, "gains space and fights for the center"),
];

/// Label used when no rule matches.
pub const GENERAL_IDEA: &str = "improves the position (general idea)";

/// One-line idea behind a legal move in the given position.
pub fn move_idea(board: &Chess, m: &Move) -> &'static str {
    RULES
        .iter()
        .find(|(applies, _)| applies(board, m))
        .map(|(_, label)| *label)
        .unwrap_or(GENERAL_IDEA)
}

fn gives_check(board: &Chess, m: &Move) -> bool {
    let mut after = board.clone();
    after.play_unchecked(*m);
    after.is_check()
}

fn is_capture(_board: &Chess, m: &Move) -> bool {
    m.is_capture()
}

fn is_castling(_board: &Chess, m: &Move) -> bool {
    m.is_castle()
}

fn develops_minor_piece(board: &Chess, m: &Move) -> bool {
    if !matches!(m.role(), Role::Knight | Role::Bishop) {
        return false;
    }
    let Some(from) = m.from() else { return false };
    let home = match board.turn() {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    };
    from.rank() == home && m.to().rank() != home
}

fn central_pawn_push(_board: &Chess, m: &Move) -> bool {
    m.role() == Role::Pawn && matches!(m.to().file(), File::D | File::E)
}
