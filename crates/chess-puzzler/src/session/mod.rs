//! Puzzle attempts: the per-user session record, its state machine, and the
//! concurrent store that owns them.

pub mod engine;
pub mod store;

use std::sync::Arc;

use chess_core::{ChessError, PuzzlePosition, Side};
use serde::Serialize;

use crate::puzzle::{DifficultyTier, Objective, Puzzle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for the solver's next ply.
    AwaitingMove,
    Solved,
    /// Reset explicitly by the user.
    Abandoned,
    /// The solution line turned out to be inconsistent with the rules.
    Corrupt,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::AwaitingMove)
    }
}

/// One user's attempt at one puzzle.
///
/// `cursor == history.len()` and `position` equals `history` replayed from
/// the starting FEN whenever the engine is not mid-transition.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) puzzle_id: Option<String>,
    pub(crate) position: PuzzlePosition,
    pub(crate) solution: Arc<[String]>,
    pub(crate) cursor: usize,
    pub(crate) history: Vec<String>,
    pub(crate) tier: DifficultyTier,
    pub(crate) objective: Objective,
    pub(crate) rating: Option<i32>,
    pub(crate) credit_rating: i32,
    pub(crate) board_visible: bool,
    pub(crate) state: SessionState,
}

impl Session {
    pub fn start(puzzle: &Puzzle) -> Result<Self, ChessError> {
        let position = PuzzlePosition::from_fen(&puzzle.fen)?;
        Ok(Self {
            puzzle_id: puzzle.id.clone(),
            position,
            solution: puzzle.solution.clone().into(),
            cursor: 0,
            history: Vec::new(),
            tier: puzzle.tier,
            objective: puzzle.objective,
            rating: puzzle.rating,
            credit_rating: puzzle.credit_rating(),
            board_visible: false,
            state: SessionState::AwaitingMove,
        })
    }

    pub fn puzzle_id(&self) -> Option<&str> {
        self.puzzle_id.as_deref()
    }

    pub fn position(&self) -> &PuzzlePosition {
        &self.position
    }

    pub fn solution(&self) -> &[String] {
        &self.solution
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn tier(&self) -> DifficultyTier {
        self.tier
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn rating(&self) -> Option<i32> {
        self.rating
    }

    /// Rating credited to the profile when this attempt is solved.
    pub fn credit_rating(&self) -> i32 {
        self.credit_rating
    }

    pub fn board_visible(&self) -> bool {
        self.board_visible
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_terminal()
    }

    /// Board text, only while the user has the board shown.
    pub fn visible_board(&self) -> Option<String> {
        self.board_visible.then(|| self.position.display_text())
    }

    pub fn summary(&self) -> SessionSummary {
        let total_plies = self.solution.len();
        let player_moves = (total_plies + 1) / 2;
        let moves_text = if self.objective.is_mate() {
            self.objective.to_string()
        } else if player_moves == 1 {
            "1 move".to_string()
        } else {
            format!("{player_moves} moves")
        };

        SessionSummary {
            puzzle_id: self.puzzle_id.clone(),
            tier: self.tier,
            objective: self.objective,
            side_to_move: self.position.side_to_move(),
            total_plies,
            player_moves,
            moves_text,
            rating: self.rating,
            board_visible: self.board_visible,
            board_text: self.visible_board(),
        }
    }
}

/// What the caller shows when an attempt starts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub puzzle_id: Option<String>,
    pub tier: DifficultyTier,
    pub objective: Objective,
    pub side_to_move: Side,
    pub total_plies: usize,
    pub player_moves: usize,
    pub moves_text: String,
    pub rating: Option<i32>,
    pub board_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_text: Option<String>,
}
