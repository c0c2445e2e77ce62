//! Integration tests for corpus loading and classification.

mod common;

use std::io::Write;

use chess_puzzler::catalog::{trace_solution, PuzzleCatalog};
use chess_puzzler::puzzle::{DifficultyTier, Objective};
use common::*;

#[test]
fn test_bundled_corpus_loads_into_all_tiers() {
    let catalog = PuzzleCatalog::load(corpus_path());
    assert_eq!(catalog.len(), 6);
    for tier in DifficultyTier::ALL {
        assert_eq!(catalog.query_by_tier(tier).len(), 2, "{tier}");
    }

    let counts = catalog.counts();
    assert_eq!(counts.len(), 3);
    assert_eq!(counts[0].label, "Medium (<2600)");
}

#[test]
fn test_bundled_corpus_lines_are_playable() {
    let catalog = PuzzleCatalog::load(corpus_path());
    for tier in DifficultyTier::ALL {
        for puzzle in catalog.query_by_tier(tier) {
            let trace = trace_solution(puzzle).unwrap();
            assert!(trace.is_consistent(), "{:?} breaks at {:?}", puzzle.id, trace.broken_at);
            assert_eq!(trace.plies.len(), puzzle.solution.len());
        }
    }
}

#[test]
fn test_bundled_objectives() {
    let catalog = PuzzleCatalog::load(corpus_path());
    let objective = |id: &str| {
        DifficultyTier::ALL
            .iter()
            .flat_map(|&tier| catalog.query_by_tier(tier))
            .find(|p| p.id.as_deref() == Some(id))
            .map(|p| p.objective)
            .unwrap()
    };
    assert_eq!(objective("it01"), Objective::PieceAttraction);
    assert_eq!(objective("rl01"), Objective::WinMaterial);
    assert_eq!(objective("fm01"), Objective::MateIn(1));
    assert_eq!(objective("pr01"), Objective::PromotePawn);
    assert_eq!(objective("ca01"), Objective::DecisiveAttack);
}

#[test]
fn test_mate_in_one_trace_ends_in_checkmate() {
    let catalog = PuzzleCatalog::load(corpus_path());
    let puzzle = catalog
        .query_by_tier(DifficultyTier::VeryHard)
        .iter()
        .find(|p| p.id.as_deref() == Some("sm01"))
        .unwrap();
    let trace = trace_solution(puzzle).unwrap();
    let last = trace.plies.last().unwrap();
    assert!(last.check);
    assert!(last.checkmate);
}

#[test]
fn test_malformed_corpus_file_degrades_to_empty() {
    let path = std::env::temp_dir().join(format!("puzzles-broken-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(br#"[{"FEN": "#).unwrap();
    drop(file);

    let catalog = PuzzleCatalog::load(&path);
    assert!(catalog.is_empty());
    assert!(PuzzleCatalog::from_file(&path).is_err());
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_partial_corpus_keeps_good_records() {
    let json = serde_json::json!([
        {"FEN": START, "Moves": "e2e4 e7e5", "Rating": 2999},
        {"Moves": "e2e4"},
        {"FEN": START, "Moves": 17},
        {"FEN": "8/8/8/8/8/8/8/8 w - - 0 1", "Moves": "e2e4"},
        {"FEN": START, "Rating": 3000, "Themes": "endgame"}
    ]);
    let catalog = PuzzleCatalog::from_json_str(&json.to_string()).unwrap();
    assert_eq!(catalog.len(), 2);

    let hard = &catalog.query_by_tier(DifficultyTier::Hard)[0];
    assert_eq!(hard.solution, ["e2e4", "e7e5"]);
    assert!(hard.themes.is_empty());

    let very_hard = &catalog.query_by_tier(DifficultyTier::VeryHard)[0];
    assert!(very_hard.solution.is_empty());
    assert_eq!(very_hard.objective, Objective::Endgame);
}
