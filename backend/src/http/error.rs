//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::dispatch::LookupError;
pub use crate::error::ApiError;
use crate::error::ElephantError;

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// A failed call round trip
    Elephant(ElephantError),
    /// The request body is not JSON
    InvalidJson(serde_json::Error),
}

/// Status code for each stage of the round trip.
pub fn status_for(err: &ElephantError) -> StatusCode {
    match err {
        ElephantError::NotFound(_) => StatusCode::NOT_FOUND,
        ElephantError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ElephantError::InvalidRequest(_)
        | ElephantError::Deserialize(_)
        | ElephantError::Runtime(_)
        | ElephantError::Serialize(_) => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Elephant(err) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    tracing::error!("{}", err);
                }
                (status, ApiError::new(err.code(), err.to_string()))
            }
            AppError::InvalidJson(err) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_REQUEST", "request body is not valid JSON").with_details(err.to_string()),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<ElephantError> for AppError {
    fn from(err: ElephantError) -> Self {
        AppError::Elephant(err)
    }
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        AppError::Elephant(err.into())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidJson(err)
    }
}
