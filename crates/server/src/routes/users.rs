use axum::{Extension, Json};
use chess_puzzler::profile::Profile;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use super::SharedService;
use crate::error::AppError;
use crate::extract::Caller;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub average_rating: i64,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        Self {
            average_rating: profile.average_rating(),
            profile,
        }
    }
}

/// POST /api/users/register
pub async fn register(
    Extension(service): Extension<SharedService>,
    Caller(user_id): Caller,
) -> Result<Json<JsonValue>, AppError> {
    let (profile, created) = service.register(&user_id).await?;
    Ok(Json(json!({
        "profile": ProfileView::from(profile),
        "created": created,
    })))
}

/// GET /api/users/me
pub async fn me(
    Extension(service): Extension<SharedService>,
    Caller(user_id): Caller,
) -> Result<Json<ProfileView>, AppError> {
    let profile = service
        .get_profile(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("NotRegistered".into()))?;
    Ok(Json(profile.into()))
}
