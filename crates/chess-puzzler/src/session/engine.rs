//! Move-submission state machine for a single puzzle attempt.
//!
//! Every outcome is a [`TransitionResult`] value. Input errors leave the
//! session untouched; only an inconsistent solution line unwinds it.

use chess_core::{MoveToken, Side};
use serde::Serialize;

use super::{Session, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Incorrect,
    CorrectContinue,
    Solved,
    AlreadySolved,
    EngineDataError,
    IllegalMove,
    MalformedMove,
    NoActiveSession,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResult {
    pub kind: TransitionKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_move: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_plies: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_to_move_next: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_text: Option<String>,
}

impl TransitionResult {
    fn new(kind: TransitionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            opponent_move: None,
            remaining_plies: None,
            side_to_move_next: None,
            board_text: None,
        }
    }

    pub fn no_active_session() -> Self {
        Self::new(
            TransitionKind::NoActiveSession,
            "No active puzzle. Pick a difficulty first.",
        )
    }

    pub fn malformed(raw: &str) -> Self {
        Self::new(
            TransitionKind::MalformedMove,
            format!("Could not read move {raw:?}. Use e2e4, e2 e4, O-O, O-O-O or e7e8q."),
        )
    }

    pub(crate) fn with_board(mut self, session: &Session) -> Self {
        self.board_text = session.visible_board();
        self
    }
}

/// Validate `raw` against the expected ply and advance the attempt.
pub fn submit_move(session: &mut Session, raw: &str) -> TransitionResult {
    match session.state {
        SessionState::AwaitingMove => {}
        SessionState::Solved => return already_solved(session),
        SessionState::Abandoned | SessionState::Corrupt => {
            return TransitionResult::no_active_session()
        }
    }

    if session.cursor >= session.solution.len() {
        return already_solved(session);
    }

    let token = match MoveToken::parse(raw) {
        Ok(token) => token,
        Err(_) => return TransitionResult::malformed(raw).with_board(session),
    };

    if !session.position.is_legal(&token) {
        return TransitionResult::new(
            TransitionKind::IllegalMove,
            format!("{token} is not possible under the rules of chess."),
        )
        .with_board(session);
    }

    let expected = match MoveToken::parse(&session.solution[session.cursor]) {
        Ok(expected) if token.matches(expected.as_str(), session.position.chess()) => expected,
        _ => {
            return TransitionResult::new(TransitionKind::Incorrect, "Wrong move.")
                .with_board(session)
        }
    };

    if session.position.apply(&token).is_err() {
        // is_legal held a moment ago; treat a refusal like any illegal move
        return TransitionResult::new(
            TransitionKind::IllegalMove,
            format!("{token} is not possible under the rules of chess."),
        )
        .with_board(session);
    }
    // history keeps the line's spelling, not the player's
    session.history.push(expected.to_string());
    session.cursor += 1;

    // Solved once at most the opponent's closing ply remains.
    let len = session.solution.len();
    if session.cursor + 1 >= len {
        session.state = SessionState::Solved;
        let message = if session.position.is_checkmate() {
            "Checkmate! Puzzle solved."
        } else {
            "Puzzle solved!"
        };
        return TransitionResult::new(TransitionKind::Solved, message).with_board(session);
    }

    play_opponent_reply(session)
}

fn play_opponent_reply(session: &mut Session) -> TransitionResult {
    let reply = session.solution[session.cursor].clone();
    let token = match MoveToken::parse(&reply) {
        Ok(token) if session.position.is_legal(&token) => token,
        _ => return unwind_corrupt(session, &reply),
    };

    let mover = session.position.side_to_move();
    if session.position.apply(&token).is_err() {
        return unwind_corrupt(session, &reply);
    }
    session.history.push(token.to_string());
    session.cursor += 1;

    let len = session.solution.len();
    let remaining = (len - session.cursor + 1) / 2;
    let move_number = session.cursor / 2 + 1;
    let next = session.position.side_to_move();

    let mut message = format!("Correct! {mover} played {token}.");
    if remaining > 0 {
        message.push_str(&format!(" Move {move_number}. Remaining: {remaining}."));
    }
    message.push_str(&format!(" Your move ({next})."));

    let mut result = TransitionResult::new(TransitionKind::CorrectContinue, message);
    result.opponent_move = Some(token.to_string());
    result.remaining_plies = Some(remaining);
    result.side_to_move_next = Some(next);
    result.with_board(session)
}

/// Undo every recorded ply and mark the attempt corrupt.
fn unwind_corrupt(session: &mut Session, reply: &str) -> TransitionResult {
    tracing::warn!(
        puzzle_id = session.puzzle_id.as_deref().unwrap_or("-"),
        fen = %session.position.start_fen(),
        cursor = session.cursor,
        token = reply,
        "Opponent reply is not playable; discarding attempt"
    );

    for _ in 0..session.history.len() {
        session.position.undo();
    }
    session.history.clear();
    session.cursor = 0;
    session.state = SessionState::Corrupt;

    TransitionResult::new(
        TransitionKind::EngineDataError,
        format!("Puzzle data error: opponent move {reply} is not possible."),
    )
}

fn already_solved(session: &Session) -> TransitionResult {
    TransitionResult::new(TransitionKind::AlreadySolved, "Puzzle already solved!").with_board(session)
}

/// Abandon the attempt. No profile bookkeeping follows.
pub fn reset(session: &mut Session) {
    session.state = SessionState::Abandoned;
}

/// Flip the board flag. Returns the new visibility.
pub fn toggle_board_visibility(session: &mut Session) -> bool {
    session.board_visible = !session.board_visible;
    session.board_visible
}
