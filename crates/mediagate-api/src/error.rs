use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Forbidden")]
    Forbidden,
    /// Rendered with an empty body so probing reveals nothing.
    #[error("Not found")]
    NotFound,
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<mediagate_core::Error> for AppError {
    fn from(error: mediagate_core::Error) -> Self {
        use mediagate_core::Error;

        match error {
            Error::NotFound(_) => Self::NotFound,
            Error::InvalidInput(message) => Self::BadRequest(message),
            Error::UnsupportedMediaType(message) => Self::UnsupportedMediaType(message),
            other => {
                tracing::error!(error = %other, "Media gate failure");
                Self::internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => return StatusCode::NOT_FOUND.into_response(),
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
