//! Maps `diplomacy_core::Error` onto HTTP status codes for the JSON API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use diplomacy_core::Error as CoreError;
use serde_json::json;

pub struct ApiError(CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::Authorization(_) => StatusCode::FORBIDDEN,
            CoreError::NoSuchGame(_) | CoreError::NoCurrentPhase(_) => StatusCode::NOT_FOUND,
            CoreError::Transient { .. } | CoreError::LogUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
