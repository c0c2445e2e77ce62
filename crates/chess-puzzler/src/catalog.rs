//! In-memory puzzle catalog.
//!
//! The corpus is loaded once at startup. A missing or malformed corpus file
//! leaves the catalog empty instead of aborting, and individual bad records
//! are skipped with a warning.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use chess_core::{MoveToken, PuzzlePosition, Side};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::CatalogError;
use crate::puzzle::classify::classify;
use crate::puzzle::{DifficultyTier, Puzzle, RawPuzzleRecord};

/// Default path to the JSON corpus.
pub const PUZZLES_FILE_PATH: &str = "data/puzzles_data.json";

#[derive(Debug, Default)]
pub struct PuzzleCatalog {
    by_tier: HashMap<DifficultyTier, Vec<Arc<Puzzle>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierCount {
    pub tier: DifficultyTier,
    pub label: &'static str,
    pub puzzles: usize,
}

impl PuzzleCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_puzzles<I: IntoIterator<Item = Puzzle>>(puzzles: I) -> Self {
        let mut by_tier: HashMap<DifficultyTier, Vec<Arc<Puzzle>>> = HashMap::new();
        for puzzle in puzzles {
            by_tier.entry(puzzle.tier).or_default().push(Arc::new(puzzle));
        }
        Self { by_tier }
    }

    /// Build from already-parsed JSON records, skipping the ones that cannot
    /// be classified or whose position cannot be set up.
    pub fn from_records(records: Vec<JsonValue>) -> Self {
        let mut puzzles = Vec::with_capacity(records.len());
        for (index, value) in records.into_iter().enumerate() {
            match parse_record(value) {
                Ok(puzzle) => puzzles.push(puzzle),
                Err(e) => tracing::warn!(index, error = %e, "Skipping puzzle record"),
            }
        }
        Self::from_puzzles(puzzles)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let root: JsonValue = serde_json::from_str(json)?;
        Self::from_root(root)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        let root: JsonValue = serde_json::from_reader(BufReader::new(file))?;
        Self::from_root(root)
    }

    /// Load the corpus, degrading to an empty catalog on any file-level error.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(catalog) => {
                for count in catalog.counts() {
                    tracing::info!(tier = %count.tier, puzzles = count.puzzles, "Loaded puzzles");
                }
                tracing::info!("Loaded puzzle catalog: {} puzzles", catalog.len());
                catalog
            }
            Err(e) => {
                tracing::warn!("Failed to load puzzles from {}: {}", path.display(), e);
                tracing::warn!("Puzzle catalog is empty; every tier will report no puzzles");
                Self::empty()
            }
        }
    }

    fn from_root(root: JsonValue) -> Result<Self, CatalogError> {
        match root {
            JsonValue::Array(records) => Ok(Self::from_records(records)),
            _ => Err(CatalogError::NotAnArray),
        }
    }

    pub fn query_by_tier(&self, tier: DifficultyTier) -> &[Arc<Puzzle>] {
        self.by_tier.get(&tier).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn pick_random<R: Rng + ?Sized>(
        &self,
        tier: DifficultyTier,
        rng: &mut R,
    ) -> Option<Arc<Puzzle>> {
        self.query_by_tier(tier).choose(rng).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_tier.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn counts(&self) -> Vec<TierCount> {
        DifficultyTier::ALL
            .iter()
            .map(|&tier| TierCount {
                tier,
                label: tier.band_label(),
                puzzles: self.query_by_tier(tier).len(),
            })
            .collect()
    }
}

fn parse_record(value: JsonValue) -> Result<Puzzle, CatalogError> {
    let raw: RawPuzzleRecord = serde_json::from_value(value)?;
    let puzzle = classify(raw)?;
    PuzzlePosition::from_fen(&puzzle.fen)?;
    Ok(puzzle)
}

/// One ply of a replayed solution line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TracedPly {
    pub index: usize,
    pub side: Side,
    pub token: String,
    pub check: bool,
    pub checkmate: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolutionTrace {
    pub plies: Vec<TracedPly>,
    /// First ply that is malformed or illegal in the replayed position.
    pub broken_at: Option<usize>,
}

impl SolutionTrace {
    pub fn is_consistent(&self) -> bool {
        self.broken_at.is_none()
    }
}

/// Replay a puzzle's solution from its starting position.
pub fn trace_solution(puzzle: &Puzzle) -> Result<SolutionTrace, CatalogError> {
    let mut position = PuzzlePosition::from_fen(&puzzle.fen)?;
    let mut plies = Vec::with_capacity(puzzle.solution.len());

    for (index, raw) in puzzle.solution.iter().enumerate() {
        let side = position.side_to_move();
        let token = match MoveToken::parse(raw) {
            Ok(token) if position.is_legal(&token) => token,
            _ => {
                return Ok(SolutionTrace {
                    plies,
                    broken_at: Some(index),
                })
            }
        };
        position.apply(&token)?;
        plies.push(TracedPly {
            index,
            side,
            token: token.to_string(),
            check: position.is_check(),
            checkmate: position.is_checkmate(),
        });
    }

    Ok(SolutionTrace {
        plies,
        broken_at: None,
    })
}
