//! Chess rules adapter for the puzzle trainer.
//!
//! Everything the session engine needs from a rules engine lives here:
//! the coordinate move-token grammar, translation of human move input, and a
//! position wrapper with apply/undo on top of `shakmaty`.

pub mod notation;
pub mod position;
pub mod uci;

pub use position::{ChessError, PuzzlePosition, Side};
pub use uci::{MalformedMove, MoveToken};
