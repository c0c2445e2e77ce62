//! Translation of human move input into coordinate tokens.
//!
//! Callers accept friendlier spellings than the engine does. This module maps
//! them onto the coordinate grammar so the session engine only ever sees
//! tokens:
//!
//! - `e2 e4` (two squares separated by whitespace)
//! - `e2e4`, `e7e8q`
//! - `O-O` / `O-O-O` (also with zeros), resolved for the side to move

use thiserror::Error;

use crate::position::Side;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("use latin letters and digits only")]
    NonAscii,

    #[error("unrecognized move format: {0:?}")]
    Unrecognized(String),
}

/// Turn raw user input into a candidate coordinate token.
///
/// The result is not validated against the token grammar here; the engine
/// does that and reports a malformed move itself.
pub fn translate_input(raw: &str, side_to_move: Side) -> Result<String, NotationError> {
    let text = raw.trim();
    if !text.is_ascii() {
        return Err(NotationError::NonAscii);
    }

    let upper = text.to_ascii_uppercase();
    let rank = side_to_move.home_rank();
    match upper.as_str() {
        "O-O" | "0-0" => return Ok(format!("e{rank}g{rank}")),
        "O-O-O" | "0-0-0" => return Ok(format!("e{rank}c{rank}")),
        _ => {}
    }

    if text.contains(char::is_whitespace) {
        let parts: Vec<&str> = text.split_whitespace().collect();
        return match parts.as_slice() {
            [from, to] => Ok(format!("{from}{to}").to_ascii_lowercase()),
            _ => Err(NotationError::Unrecognized(text.to_string())),
        };
    }

    match text.len() {
        4 | 5 => Ok(text.to_ascii_lowercase()),
        _ => Err(NotationError::Unrecognized(text.to_string())),
    }
}
