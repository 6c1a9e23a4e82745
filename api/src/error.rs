use axum::http::StatusCode;
use axum::{response::IntoResponse, Json};
use thiserror::Error;
use tracing::{error, warn};

/// Failures surfaced by the prediction endpoint.
///
/// Client mistakes map to 400, everything else to 500. The body is always
/// `{"error": <message>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Please provide physics, chemistry, math, kcet marks, and category")]
    MissingField,

    #[error("Invalid input. PCM and KCET should be integers")]
    InvalidType,

    #[error("Invalid category")]
    InvalidCategory,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("College data file not found: {0}")]
    DataUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField
            | ApiError::InvalidType
            | ApiError::InvalidCategory
            | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::DataUnavailable(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(%status, error = %message, "request failed");
        } else {
            warn!(%status, error = %message, "request rejected");
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised while loading the regression model at startup.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file not found: {0}")]
    NotFound(String),

    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("model file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("invalid model: {0}")]
    Invalid(String),
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
