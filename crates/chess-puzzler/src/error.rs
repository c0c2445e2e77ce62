//! Puzzle trainer error types

use thiserror::Error;

use chess_core::ChessError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corpus root must be a JSON array")]
    NotAnArray,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unplayable position: {0}")]
    Position(#[from] ChessError),
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Profile storage error: {0}")]
    Storage(String),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("Puzzle could not be started: {0}")]
    Chess(#[from] ChessError),
}
