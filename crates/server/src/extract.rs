use axum::{extract::FromRequestParts, http::request::Parts};
use chess_puzzler::UserId;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
const MAX_USER_ID_LEN: usize = 128;

/// Caller identity taken from the `X-User-Id` header.
///
/// The surrounding platform vouches for the id; nothing is verified here
/// beyond its shape.
#[derive(Debug, Clone)]
pub struct Caller(pub UserId);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Missing X-User-Id header".into()))?
            .to_str()
            .map_err(|_| AppError::BadRequest("X-User-Id must be visible ASCII".into()))?;

        parse_user_id(raw).map(Caller)
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, AppError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AppError::Unauthorized("Missing X-User-Id header".into()));
    }
    if id.len() > MAX_USER_ID_LEN {
        return Err(AppError::BadRequest(format!(
            "X-User-Id longer than {MAX_USER_ID_LEN} bytes"
        )));
    }
    Ok(UserId::new(id))
}
