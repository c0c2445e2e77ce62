//! Tier and objective classification of raw corpus records.
//!
//! Pure functions of (rating, themes, move count): the same record always
//! yields the same tier and objective.

use super::{DifficultyTier, Objective, Puzzle, RawPuzzleRecord, DEFAULT_TIER_RATING};
use crate::error::CatalogError;

const MATE_THEMES: [&str; 3] = ["mate", "mateIn2", "mateIn3"];

/// Classify one record. Only `FEN` is required; absent `Moves`/`Themes`
/// degrade to empty sequences.
pub fn classify(raw: RawPuzzleRecord) -> Result<Puzzle, CatalogError> {
    let fen = raw
        .fen
        .filter(|f| !f.trim().is_empty())
        .ok_or(CatalogError::MissingField("FEN"))?;

    let solution: Vec<String> = raw
        .moves
        .as_deref()
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let themes: Vec<String> = raw
        .themes
        .as_deref()
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let tier = DifficultyTier::from_rating(raw.rating.unwrap_or(DEFAULT_TIER_RATING));
    let objective = objective_for(&themes, solution.len());

    Ok(Puzzle {
        id: raw.id,
        fen,
        solution,
        tier,
        objective,
        rating: raw.rating,
        themes,
    })
}

/// Objective from theme tags. Mate themes win; otherwise the first match in
/// priority order, falling back to winning material.
pub fn objective_for(themes: &[String], total_moves: usize) -> Objective {
    let has = |tag: &str| themes.iter().any(|t| t == tag);

    if MATE_THEMES.iter().any(|t| has(*t)) {
        return Objective::MateIn(mate_depth(total_moves));
    }

    if has("advancedPawn") || has("promotion") {
        Objective::PromotePawn
    } else if has("endgame") {
        Objective::Endgame
    } else if has("crushing") {
        Objective::DecisiveAttack
    } else if has("attraction") {
        Objective::PieceAttraction
    } else {
        Objective::WinMaterial
    }
}

/// One to three plies the count is used as is; any other length counts
/// `plies / 2 + 1` moves, so an empty line is still a mate in 1.
fn mate_depth(total_moves: usize) -> usize {
    match total_moves {
        1..=3 => total_moves,
        _ => total_moves / 2 + 1,
    }
}
