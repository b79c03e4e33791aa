//! Error types for the dashboard API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dealer_engine::EngineError;
use thiserror::Error;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Engine error.
    #[error("{0}")]
    Engine(#[from] EngineError),

    /// The request body was unusable.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(EngineError::UnknownCollection(_) | EngineError::UnknownReport(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Engine(EngineError::InvalidParameters(_)) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(EngineError::UnknownReport("weather".into()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad = ApiError::from(EngineError::InvalidParameters("expected an object".into()));
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let internal = ApiError::from(EngineError::Configuration("broken".into()));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
