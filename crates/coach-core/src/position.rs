//! FEN validation and canonical encoding

use shakmaty::{fen::Fen, CastlingMode, Chess, Color, EnPassantMode, Position};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvalidPositionError {
    #[error("malformed FEN: {0}")]
    Syntax(String),

    #[error("illegal position: {0}")]
    Illegal(String),
}

/// A validated position together with its canonical FEN encoding.
///
/// Any two inputs describing the same game state canonicalize to the same
/// encoding, so encodings compare as plain strings. The encoding is fixed at
/// construction; re-parsing it yields an identical encoding.
#[derive(Debug, Clone)]
pub struct NormalizedPosition {
    fen: String,
    board: Chess,
}

impl NormalizedPosition {
    /// Parse and canonicalize a FEN string.
    ///
    /// Rejects malformed text (`Syntax`) and structurally impossible states
    /// such as missing kings, the side not to move standing in check, or
    /// castling/en-passant fields that do not match the board (`Illegal`).
    pub fn parse(raw: &str) -> Result<Self, InvalidPositionError> {
        let fen: Fen = raw
            .trim()
            .parse()
            .map_err(|e| InvalidPositionError::Syntax(format!("{e}")))?;
        let board: Chess = fen
            .into_position(CastlingMode::Standard)
            .map_err(|e| InvalidPositionError::Illegal(format!("{e}")))?;
        // Re-emit through shakmaty so unreachable en-passant targets and
        // equivalent spellings collapse onto one encoding.
        let fen = Fen::from_position(&board, EnPassantMode::Legal).to_string();
        Ok(Self { fen, board })
    }

    /// Canonical FEN encoding.
    pub fn encoding(&self) -> &str {
        &self.fen
    }

    /// The validated board behind the encoding.
    pub fn board(&self) -> &Chess {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.board.turn()
    }
}

impl PartialEq for NormalizedPosition {
    fn eq(&self, other: &Self) -> bool {
        self.fen == other.fen
    }
}

impl Eq for NormalizedPosition {}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn starting_position_is_already_canonical() {
        let pos = NormalizedPosition::parse(STARTING_FEN).unwrap();
        assert_eq!(pos.encoding(), STARTING_FEN);
        assert_eq!(pos.turn(), Color::White);
    }

    #[test]
    fn normalization_is_idempotent() {
        // After 1. e4 the raw FEN often carries an e3 en-passant target even
        // though no pawn can legally capture there; canonicalization drops it.
        let raw = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let once = NormalizedPosition::parse(raw).unwrap();
        let twice = NormalizedPosition::parse(once.encoding()).unwrap();
        assert_eq!(once.encoding(), twice.encoding());
        assert_eq!(once, twice);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let pos = NormalizedPosition::parse(&format!("  {STARTING_FEN}\n")).unwrap();
        assert_eq!(pos.encoding(), STARTING_FEN);
    }

    #[test]
    fn garbage_is_a_syntax_error() {
        let err = NormalizedPosition::parse("what is the best move?").unwrap_err();
        assert!(matches!(err, InvalidPositionError::Syntax(_)));
    }

    #[test]
    fn missing_kings_are_rejected() {
        let err = NormalizedPosition::parse("8/8/8/8/8/8/8/8 w - - 0 1").unwrap_err();
        assert!(matches!(err, InvalidPositionError::Illegal(_)));
    }

    #[test]
    fn two_kings_per_side_are_rejected() {
        let err = NormalizedPosition::parse("kk6/8/8/8/8/8/8/KK6 w - - 0 1").unwrap_err();
        assert!(matches!(err, InvalidPositionError::Illegal(_)));
    }

    #[test]
    fn side_not_to_move_in_check_is_rejected() {
        // Black king on e8 is attacked by the a8 rook while White is to move.
        let err = NormalizedPosition::parse("R3k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err();
        assert!(matches!(err, InvalidPositionError::Illegal(_)));
    }

    #[test]
    fn castling_rights_without_rooks_are_rejected() {
        let err = NormalizedPosition::parse("4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1").unwrap_err();
        assert!(matches!(err, InvalidPositionError::Illegal(_)));
    }
}
