//! Coordinate move tokens: from-square + to-square, optional promotion piece.
//!
//! This is the only place move text is interpreted. Castling is the king's own
//! two-square move (`e1g1`, `e8c8`); symbolic castle notation is translated by
//! [`crate::notation`] before a token is ever parsed.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, Move};

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-h][1-8][a-h][1-8][nbrq]?$").unwrap());

/// Text that does not match the 4/5-character coordinate grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed move token: {0:?}")]
pub struct MalformedMove(pub String);

/// A syntactically valid coordinate move, canonicalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveToken {
    text: String,
    uci: UciMove,
}

impl MoveToken {
    /// Parse a raw token. Surrounding whitespace and letter case are ignored,
    /// so `E7E8Q` and `e7e8q` yield the same token.
    pub fn parse(raw: &str) -> Result<Self, MalformedMove> {
        let text = raw.trim().to_ascii_lowercase();
        if !TOKEN_RE.is_match(&text) {
            return Err(MalformedMove(raw.to_string()));
        }
        let uci = UciMove::from_ascii(text.as_bytes()).map_err(|_| MalformedMove(raw.to_string()))?;
        Ok(Self { text, uci })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Resolve against a position. `None` when the move is not legal there.
    pub fn resolve(&self, pos: &Chess) -> Option<Move> {
        self.uci.to_move(pos).ok()
    }

    /// Whether `expected` denotes the same move as this token in `pos`.
    ///
    /// Identical canonical text always matches. Otherwise both must resolve
    /// to the same legal move object, which tolerates alternate spellings of
    /// one move but never gives credit for a different move.
    pub fn matches(&self, expected: &str, pos: &Chess) -> bool {
        let Ok(expected) = MoveToken::parse(expected) else {
            return false;
        };
        if expected.text == self.text {
            return true;
        }
        match (self.resolve(pos), expected.resolve(pos)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl FromStr for MoveToken {
    type Err = MalformedMove;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveToken::parse(s)
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
