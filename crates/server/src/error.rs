use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_puzzler::error::ServiceError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Service(ServiceError::Profile(e)) => {
                tracing::error!("Profile storage error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Progress could not be saved, please retry".to_string(),
                )
            }
            AppError::Service(ServiceError::Chess(e)) => {
                tracing::error!("Puzzle setup error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Puzzle could not be started".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "detail": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_puzzler::error::ProfileError;

    #[test]
    fn test_persistence_failure_is_retryable() {
        let err = AppError::from(ServiceError::from(ProfileError::Storage("down".into())));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!message.contains("down"));
    }

    #[test]
    fn test_puzzle_setup_failure_hides_details() {
        let err = AppError::from(ServiceError::from(chess_puzzler::chess_core::ChessError::InvalidFen(
            "8/8 w".into(),
        )));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Puzzle could not be started");
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let (status, message) = AppError::NotFound("NotRegistered".into()).status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "NotRegistered");
        assert_eq!(
            AppError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
