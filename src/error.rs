use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("trip {0} not found")]
    TripNotFound(String),
    #[error("a decision for trip {trip_id} was already recorded")]
    AlreadyDecided { trip_id: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid SIWE signature: {0}")]
    InvalidSignature(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("trip store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::TripNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyDecided { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized | AppError::InvalidSignature(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::StoreUnavailable(_)
            | AppError::Config(_)
            | AppError::Io(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::TripNotFound(_) => "TRIP_NOT_FOUND",
            AppError::AlreadyDecided { .. } => "ALREADY_DECIDED",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidSignature(_) => "INVALID_SIGNATURE",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::Config(_) | AppError::Io(_) | AppError::Other(_) => "INTERNAL_ERROR",
        }
    }
}

// Malformed bodies and query strings are validation errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "an internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = json!({
            "error": message,
            "code": self.code(),
        });

        (status, Json(body)).into_response()
    }
}
