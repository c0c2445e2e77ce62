use axum::{Extension, Json};
use chess_puzzler::puzzle::DifficultyTier;
use chess_puzzler::service::{BoardAck, ResetAck, TierSelection};
use chess_puzzler::session::engine::TransitionResult;
use chess_puzzler::session::SessionSummary;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use super::SharedService;
use crate::error::AppError;
use crate::extract::Caller;

#[derive(Deserialize)]
pub struct SelectTierRequest {
    pub tier: DifficultyTier,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    #[serde(rename = "move")]
    pub input: String,
}

/// GET /api/puzzles/stats
pub async fn get_puzzle_stats(Extension(service): Extension<SharedService>) -> Json<JsonValue> {
    let catalog = service.catalog();
    Json(json!({
        "total": catalog.len(),
        "tiers": catalog.counts(),
    }))
}

/// POST /api/puzzles/session
pub async fn start_session(
    Extension(service): Extension<SharedService>,
    Caller(user_id): Caller,
    Json(req): Json<SelectTierRequest>,
) -> Result<Json<SessionSummary>, AppError> {
    match service.select_tier(&user_id, req.tier).await? {
        TierSelection::Started(summary) => Ok(Json(summary)),
        TierSelection::NoPuzzlesForTier { .. } => {
            Err(AppError::NotFound("NoPuzzlesForTier".into()))
        }
    }
}

/// POST /api/puzzles/session/move
pub async fn submit_move(
    Extension(service): Extension<SharedService>,
    Caller(user_id): Caller,
    Json(req): Json<MoveRequest>,
) -> Result<Json<TransitionResult>, AppError> {
    let result = service.submit_input(&user_id, &req.input).await?;
    Ok(Json(result))
}

/// POST /api/puzzles/session/reset
pub async fn reset_session(
    Extension(service): Extension<SharedService>,
    Caller(user_id): Caller,
) -> Result<Json<ResetAck>, AppError> {
    Ok(Json(service.reset(&user_id).await?))
}

/// POST /api/puzzles/session/board
pub async fn toggle_board(
    Extension(service): Extension<SharedService>,
    Caller(user_id): Caller,
) -> Result<Json<BoardAck>, AppError> {
    service
        .toggle_board(&user_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("NoActiveSession".into()))
}
