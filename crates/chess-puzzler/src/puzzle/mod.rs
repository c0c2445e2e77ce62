//! Puzzle data model: difficulty tiers, objectives, corpus records

pub mod classify;

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Rating assumed for tier placement when a record carries none.
pub const DEFAULT_TIER_RATING: i32 = 1500;

/// Rating credited to a profile for solving a puzzle that carries none.
pub const DEFAULT_CREDIT_RATING: i32 = 1000;

/// Difficulty bucket derived from the puzzle rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Medium,
    Hard,
    VeryHard,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [Self::Medium, Self::Hard, Self::VeryHard];

    /// `< 2600` Medium, `2600..3000` Hard, anything above VeryHard.
    pub fn from_rating(rating: i32) -> Self {
        if rating < 2600 {
            Self::Medium
        } else if rating < 3000 {
            Self::Hard
        } else {
            Self::VeryHard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::VeryHard => "very_hard",
        }
    }

    /// Human label with the rating band, as shown on tier pickers.
    pub fn band_label(&self) -> &'static str {
        match self {
            Self::Medium => "Medium (<2600)",
            Self::Hard => "Hard (2600-3000)",
            Self::VeryHard => "Very hard (>3000)",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::VeryHard => "Very hard",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty tier: {0:?}")]
pub struct UnknownTier(pub String);

impl FromStr for DifficultyTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "veryhard" => Ok(Self::VeryHard),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

/// What the solver is asked to achieve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Objective {
    MateIn(usize),
    PromotePawn,
    Endgame,
    DecisiveAttack,
    PieceAttraction,
    WinMaterial,
}

impl Objective {
    pub fn is_mate(&self) -> bool {
        matches!(self, Self::MateIn(_))
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MateIn(n) => write!(f, "Mate in {n}"),
            Self::PromotePawn => f.write_str("Promote a pawn"),
            Self::Endgame => f.write_str("Endgame"),
            Self::DecisiveAttack => f.write_str("Decisive attack"),
            Self::PieceAttraction => f.write_str("Piece attraction"),
            Self::WinMaterial => f.write_str("Win material"),
        }
    }
}

impl Serialize for Objective {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One record of the puzzle corpus, as stored on disk (Lichess column names).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPuzzleRecord {
    #[serde(rename = "PuzzleId", default)]
    pub id: Option<String>,
    #[serde(rename = "FEN", default)]
    pub fen: Option<String>,
    #[serde(rename = "Moves", default)]
    pub moves: Option<String>,
    #[serde(rename = "Rating", default, deserialize_with = "lenient_rating")]
    pub rating: Option<i32>,
    #[serde(rename = "Themes", default)]
    pub themes: Option<String>,
}

/// Corpus exports sometimes write ratings as floats (`1800.0`).
fn lenient_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Number::Int(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("rating {n} out of range"))),
        Some(Number::Float(f)) => {
            let rounded = f.round();
            let range = f64::from(i32::MIN)..=f64::from(i32::MAX);
            if rounded.is_finite() && range.contains(&rounded) {
                Ok(Some(rounded as i32))
            } else {
                Err(de::Error::custom(format!("rating {f} out of range")))
            }
        }
    }
}

/// A classified puzzle. Immutable once the catalog is loaded.
#[derive(Debug, Clone, Serialize)]
pub struct Puzzle {
    pub id: Option<String>,
    pub fen: String,
    /// Solver and opponent plies alternating, solver first.
    pub solution: Vec<String>,
    pub tier: DifficultyTier,
    pub objective: Objective,
    /// Rating as recorded in the corpus, if any.
    pub rating: Option<i32>,
    pub themes: Vec<String>,
}

impl Puzzle {
    pub fn tier_rating(&self) -> i32 {
        self.rating.unwrap_or(DEFAULT_TIER_RATING)
    }

    pub fn credit_rating(&self) -> i32 {
        self.rating.unwrap_or(DEFAULT_CREDIT_RATING)
    }
}
