use std::sync::Arc;

use chess_puzzler::service::PuzzleService;

pub mod health;
pub mod puzzles;
pub mod users;

/// Service handle shared with every handler through an `Extension` layer.
pub type SharedService = Arc<PuzzleService>;
