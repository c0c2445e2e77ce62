use axum::{Extension, Json};
use serde_json::{json, Value as JsonValue};

use super::SharedService;

/// GET /health
pub async fn health_check(Extension(service): Extension<SharedService>) -> Json<JsonValue> {
    Json(json!({
        "status": "ok",
        "puzzles": service.catalog().len(),
    }))
}
