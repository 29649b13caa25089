//! HTTP error mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::repository::RepositoryError;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Repository(RepositoryError::NotFound { entity, id }) => {
                (StatusCode::NOT_FOUND, format!("{} not found: {}", entity, id))
            }
            ApiError::Repository(RepositoryError::Invalid(msg)) | ApiError::BadRequest(msg) => {
                warn!("rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Repository(e) => {
                // Details stay in the log; clients only learn that storage failed.
                error!("storage failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
