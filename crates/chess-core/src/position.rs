//! Position adapter over `shakmaty`.
//!
//! `shakmaty` positions are immutable values with no undo, so
//! [`PuzzlePosition`] keeps a stack of snapshots: every `apply` pushes the
//! position it came from and every `undo` pops one.

use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, File, Position, Rank, Square};
use thiserror::Error;

use crate::uci::MoveToken;

#[derive(Debug, Error)]
pub enum ChessError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// Back rank of this side's king: rank 1 for White, rank 8 for Black.
    pub fn home_rank(self) -> char {
        match self {
            Side::White => '1',
            Side::Black => '8',
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("White"),
            Side::Black => f.write_str("Black"),
        }
    }
}

/// A board seeded from a puzzle FEN, with paired apply/undo.
#[derive(Debug, Clone)]
pub struct PuzzlePosition {
    start: Chess,
    current: Chess,
    undo_stack: Vec<Chess>,
}

impl PuzzlePosition {
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let parsed: Fen = fen
            .trim()
            .parse()
            .map_err(|e| ChessError::InvalidFen(format!("{e}")))?;
        let start: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| ChessError::InvalidFen(format!("{e}")))?;
        Ok(Self {
            current: start.clone(),
            start,
            undo_stack: Vec::new(),
        })
    }

    pub fn chess(&self) -> &Chess {
        &self.current
    }

    pub fn is_legal(&self, token: &MoveToken) -> bool {
        token.resolve(&self.current).is_some()
    }

    /// Play `token` in place. The caller pairs every successful apply with
    /// at most one [`undo`](Self::undo).
    pub fn apply(&mut self, token: &MoveToken) -> Result<(), ChessError> {
        let mv = token
            .resolve(&self.current)
            .ok_or_else(|| ChessError::IllegalMove(token.to_string()))?;
        self.undo_stack.push(self.current.clone());
        self.current.play_unchecked(mv);
        Ok(())
    }

    /// Revert the most recent apply. Returns false when nothing was applied.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }

    /// Number of plies currently applied on top of the starting position.
    pub fn plies_applied(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_checkmate(&self) -> bool {
        self.current.is_checkmate()
    }

    pub fn is_check(&self) -> bool {
        self.current.is_check()
    }

    pub fn side_to_move(&self) -> Side {
        self.current.turn().into()
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.current, EnPassantMode::Legal).to_string()
    }

    pub fn start_fen(&self) -> String {
        Fen::from_position(&self.start, EnPassantMode::Legal).to_string()
    }

    /// Text board seen from the side to move: FEN piece letters, `.` for
    /// empty squares, one rank per line.
    pub fn display_text(&self) -> String {
        let board = self.current.board();
        let flipped = self.current.turn() == Color::Black;

        let mut ranks: Vec<Rank> = Rank::ALL.to_vec();
        let mut files: Vec<File> = File::ALL.to_vec();
        if flipped {
            files.reverse();
        } else {
            ranks.reverse();
        }

        ranks
            .iter()
            .map(|&rank| {
                files
                    .iter()
                    .map(|&file| {
                        board
                            .piece_at(Square::from_coords(file, rank))
                            .map_or('.', |piece| piece.char())
                            .to_string()
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
