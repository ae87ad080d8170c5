//! Mapping of registry errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tabletop_core::GameError;

/// A rejected request; the body is `{error, kind}`
#[derive(Debug)]
pub struct ApiError(pub GameError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::CapacityError { .. }
            | GameError::GameClosed
            | GameError::AlreadyInGame(_)
            | GameError::ColorTaken(_)
            | GameError::NotYourTurn
            | GameError::NotPlaying
            | GameError::AlreadyRolled
            | GameError::NoPendingRoll => StatusCode::CONFLICT,
            GameError::IllegalPiece
            | GameError::IllegalMove(_)
            | GameError::MandatoryCapture
            | GameError::MustContinueCapture
            | GameError::WrongGameType { .. }
            | GameError::PreconditionError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.0.to_string(),
            "kind": self.0.kind(),
        });
        (self.status(), Json(body)).into_response()
    }
}
