//! Integration tests for the move-submission state machine.
//!
//! Every scenario drives a real position through `engine::submit_move` and
//! checks both the returned transition and the session bookkeeping.

mod common;

use chess_core::notation::translate_input;
use chess_core::{MoveToken, PuzzlePosition, Side};
use chess_puzzler::session::engine::{self, TransitionKind};
use chess_puzzler::session::{Session, SessionState};
use common::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Replay the session history from its starting FEN.
fn replayed_fen(session: &Session) -> String {
    let mut position = PuzzlePosition::from_fen(&session.position().start_fen()).unwrap();
    for token in session.history() {
        position.apply(&MoveToken::parse(token).unwrap()).unwrap();
    }
    position.fen()
}

fn assert_consistent(session: &Session) {
    assert_eq!(session.history().len(), session.cursor());
    assert_eq!(replayed_fen(session), session.position().fen());
}

// ---------------------------------------------------------------------------
// Solved boundary
// ---------------------------------------------------------------------------

#[test]
fn test_single_ply_solution_solves_immediately() {
    let mut s = session(ITALIAN, "f3g5");
    let result = engine::submit_move(&mut s, "f3g5");
    assert_eq!(result.kind, TransitionKind::Solved);
    assert_eq!(s.state(), SessionState::Solved);
    assert_eq!(s.cursor(), 1);
    assert_consistent(&s);
}

#[test]
fn test_two_ply_solution_solves_before_the_reply() {
    let mut s = session(START, "e2e4 e7e5");
    let result = engine::submit_move(&mut s, "e2e4");
    assert_eq!(result.kind, TransitionKind::Solved);
    assert!(result.opponent_move.is_none());
    assert_eq!(s.history(), ["e2e4"]);
    assert_consistent(&s);

    let again = engine::submit_move(&mut s, "e7e5");
    assert_eq!(again.kind, TransitionKind::AlreadySolved);
    assert_eq!(s.cursor(), 1);
}

#[test]
fn test_odd_line_plays_replies_until_final_ply() {
    let mut s = session(START, "e2e4 e7e5 g1f3 b8c6 f1b5");

    let first = engine::submit_move(&mut s, "e2e4");
    assert_eq!(first.kind, TransitionKind::CorrectContinue);
    assert_eq!(first.opponent_move.as_deref(), Some("e7e5"));
    assert_eq!(first.remaining_plies, Some(2));
    assert_eq!(first.side_to_move_next, Some(Side::White));
    assert_consistent(&s);

    let second = engine::submit_move(&mut s, "g1f3");
    assert_eq!(second.kind, TransitionKind::CorrectContinue);
    assert_eq!(second.opponent_move.as_deref(), Some("b8c6"));
    assert_eq!(second.remaining_plies, Some(1));
    assert_eq!(s.cursor(), 4);
    assert_consistent(&s);

    let last = engine::submit_move(&mut s, "f1b5");
    assert_eq!(last.kind, TransitionKind::Solved);
    assert_eq!(s.cursor(), 5);
    assert_consistent(&s);
}

#[test]
fn test_even_line_ends_one_ply_early() {
    let mut s = session(START, "e2e4 e7e5 g1f3 b8c6");
    assert_eq!(engine::submit_move(&mut s, "e2e4").kind, TransitionKind::CorrectContinue);
    assert_eq!(engine::submit_move(&mut s, "g1f3").kind, TransitionKind::Solved);
    assert_eq!(s.history(), ["e2e4", "e7e5", "g1f3"]);
}

#[test]
fn test_mating_move_reports_checkmate() {
    let mut s = session(FOOLS_MATE, "d8h4");
    assert_eq!(s.position().side_to_move(), Side::Black);
    let result = engine::submit_move(&mut s, "d8h4");
    assert_eq!(result.kind, TransitionKind::Solved);
    assert!(result.message.contains("Checkmate"));
    assert!(s.position().is_checkmate());
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

#[test]
fn test_wrong_legal_move_changes_nothing() {
    let mut s = session(START, "e2e4 e7e5 g1f3");
    let before_fen = s.position().fen();

    let result = engine::submit_move(&mut s, "d2d4");
    assert_eq!(result.kind, TransitionKind::Incorrect);
    assert_eq!(s.cursor(), 0);
    assert!(s.history().is_empty());
    assert_eq!(s.position().fen(), before_fen);
    assert_eq!(s.state(), SessionState::AwaitingMove);

    // still solvable afterwards
    assert_eq!(engine::submit_move(&mut s, "e2e4").kind, TransitionKind::CorrectContinue);
}

#[test]
fn test_grammar_is_checked_before_legality() {
    let mut s = session(START, "e2e4 e7e5 g1f3");
    for raw in ["", "e9e4", "e2-e4", "Nf3", "e2e4k", "e2e4qq"] {
        assert_eq!(
            engine::submit_move(&mut s, raw).kind,
            TransitionKind::MalformedMove,
            "{raw:?}"
        );
    }
    assert_eq!(engine::submit_move(&mut s, "e1e2").kind, TransitionKind::IllegalMove);
    assert_eq!(engine::submit_move(&mut s, "a7a6").kind, TransitionKind::IllegalMove);
    assert_consistent(&s);
}

#[test]
fn test_promotion_piece_case_is_ignored() {
    let mut s = session(PROMOTION, "e7e8q a2b2 e8e4");
    assert_eq!(engine::submit_move(&mut s, "e7e8n").kind, TransitionKind::Incorrect);
    let result = engine::submit_move(&mut s, "E7E8Q");
    assert_eq!(result.kind, TransitionKind::CorrectContinue);
    assert_eq!(result.opponent_move.as_deref(), Some("a2b2"));
    assert_eq!(engine::submit_move(&mut s, "e8e4").kind, TransitionKind::Solved);
    assert_consistent(&s);
}

#[test]
fn test_castling_arrives_as_king_move() {
    let mut s = session(ITALIAN, "e1g1 f8c5 d2d3");
    let token = translate_input("O-O", s.position().side_to_move()).unwrap();
    assert_eq!(token, "e1g1");

    let result = engine::submit_move(&mut s, &token);
    assert_eq!(result.kind, TransitionKind::CorrectContinue);
    assert_eq!(result.opponent_move.as_deref(), Some("f8c5"));
    assert_eq!(engine::submit_move(&mut s, "d2d3").kind, TransitionKind::Solved);
    assert_consistent(&s);
}

#[test]
fn test_history_records_the_line_spelling() {
    let mut s = session(ITALIAN, "e1g1 f8c5 d2d3");

    let result = engine::submit_move(&mut s, "e1h1");
    assert_eq!(result.kind, TransitionKind::CorrectContinue);
    assert_eq!(s.history(), ["e1g1", "f8c5"]);
    assert_consistent(&s);
}

// ---------------------------------------------------------------------------
// Corrupt solution lines
// ---------------------------------------------------------------------------

#[test]
fn test_illegal_reply_rolls_back_to_start() {
    let mut s = session(START, "e2e4 e7e4 g1f3");
    let start_fen = s.position().fen();

    let result = engine::submit_move(&mut s, "e2e4");
    assert_eq!(result.kind, TransitionKind::EngineDataError);
    assert_eq!(s.state(), SessionState::Corrupt);
    assert_eq!(s.cursor(), 0);
    assert!(s.history().is_empty());
    assert_eq!(s.position().fen(), start_fen);
    assert_eq!(s.position().plies_applied(), 0);
}

#[test]
fn test_deep_corruption_unwinds_every_ply() {
    let mut s = session(START, "e2e4 e7e5 g1f3 e8e6 f1c4");
    let start_fen = s.position().fen();

    assert_eq!(engine::submit_move(&mut s, "e2e4").kind, TransitionKind::CorrectContinue);
    assert_eq!(engine::submit_move(&mut s, "g1f3").kind, TransitionKind::EngineDataError);
    assert_eq!(s.cursor(), 0);
    assert!(s.history().is_empty());
    assert_eq!(s.position().fen(), start_fen);
}

#[test]
fn test_malformed_reply_is_a_data_error() {
    let mut s = session(START, "e2e4 zz f1c4");
    assert_eq!(engine::submit_move(&mut s, "e2e4").kind, TransitionKind::EngineDataError);
    assert_eq!(engine::submit_move(&mut s, "e2e4").kind, TransitionKind::NoActiveSession);
}

// ---------------------------------------------------------------------------
// Terminal states and flags
// ---------------------------------------------------------------------------

#[test]
fn test_input_after_solve_is_idempotent() {
    let mut s = session(ITALIAN, "f3g5");
    engine::submit_move(&mut s, "f3g5");
    let history = s.history().to_vec();
    for raw in ["f3g5", "a7a6", "nonsense"] {
        assert_eq!(engine::submit_move(&mut s, raw).kind, TransitionKind::AlreadySolved);
    }
    assert_eq!(s.history(), history.as_slice());
    assert_eq!(s.cursor(), 1);
}

#[test]
fn test_board_toggle_never_moves_pieces() {
    let mut s = session(START, "e2e4 e7e5 g1f3");
    engine::submit_move(&mut s, "e2e4");
    let fen = s.position().fen();

    assert!(engine::toggle_board_visibility(&mut s));
    let result = engine::submit_move(&mut s, "a2a3");
    let board = result.board_text.expect("board shown while visible");
    assert_eq!(board.lines().count(), 8);
    assert_eq!(s.position().fen(), fen);
    assert_eq!(s.cursor(), 2);

    assert!(!engine::toggle_board_visibility(&mut s));
    assert!(engine::submit_move(&mut s, "a2a3").board_text.is_none());
}

#[test]
fn test_summary_describes_the_attempt() {
    let s = session(START, "e2e4 e7e5 g1f3 b8c6 f1b5");
    let summary = s.summary();
    assert_eq!(summary.total_plies, 5);
    assert_eq!(summary.player_moves, 3);
    assert_eq!(summary.moves_text, "3 moves");
    assert_eq!(summary.side_to_move, Side::White);
    assert!(!summary.board_visible);
    assert!(summary.board_text.is_none());

    let single = session(ITALIAN, "f3g5").summary();
    assert_eq!(single.moves_text, "1 move");

    let mate = Session::start(&puzzle(FOOLS_MATE, "d8h4", Some(2700), "mate")).unwrap();
    let summary = mate.summary();
    assert_eq!(summary.moves_text, "Mate in 1");
    assert_eq!(summary.side_to_move, Side::Black);
    assert_eq!(summary.rating, Some(2700));
}
