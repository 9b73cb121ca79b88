//! Movetext replay: regex-based SAN extraction.

use std::sync::LazyLock;

use regex::Regex;
use shakmaty::{san::San, Chess, Position};

use crate::board::Board;
use crate::error::BoardError;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]*\}").unwrap());
static VARIATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());
static SAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O|O-O").unwrap()
});

/// Extract SAN moves from PGN text (headers, comments, variations, move
/// numbers and results are dropped).
pub fn extract_moves(pgn: &str) -> Vec<String> {
    let no_headers = HEADER_RE.replace_all(pgn, "");
    let no_comments = COMMENT_RE.replace_all(&no_headers, "");
    let no_variations = VARIATION_RE.replace_all(&no_comments, "");

    SAN_RE
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Play every SAN move of `pgn` from the standard starting position.
///
/// The returned board has an empty undo stack: the replayed line becomes its
/// starting point.
pub fn replay(pgn: &str) -> Result<Board, BoardError> {
    let mut pos = Chess::default();

    for (ply, token) in extract_moves(pgn).into_iter().enumerate() {
        let san: San = token.parse().map_err(|e| BoardError::InvalidSan {
            token: token.clone(),
            ply,
            reason: format!("{e}"),
        })?;
        let mv = san.to_move(&pos).map_err(|e| BoardError::InvalidSan {
            token: token.clone(),
            ply,
            reason: format!("{e}"),
        })?;
        pos.play_unchecked(mv);
    }

    Ok(Board::from_position(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::side::Side;

    #[test]
    fn test_extract_moves_strips_noise() {
        let pgn = r#"[Event "Casual"]
[Result "1-0"]

1. e4 e5 {book} 2. Nf3 (2. f4 exf4) Nc6 3. Bb5 a6 1-0"#;
        assert_eq!(extract_moves(pgn), vec!["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);
    }

    #[test]
    fn test_replay_plain_movetext() {
        let board = replay("e4 e5 Nf3 Nc6 Bc4 Nf6").unwrap();
        assert_eq!(
            board.fen(),
            "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"
        );
        assert_eq!(board.turn(), Side::White);
        assert_eq!(board.depth(), 0);
    }

    #[test]
    fn test_replay_reports_illegal_ply() {
        let err = replay("e4 e5 Ke3").unwrap_err();
        match err {
            BoardError::InvalidSan { token, ply, .. } => {
                assert_eq!(token, "Ke3");
                assert_eq!(ply, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
