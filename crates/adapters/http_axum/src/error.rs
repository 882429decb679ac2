//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use homectl_domain::error::{HomeCtlError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`HomeCtlError`] to an HTTP response with appropriate status code.
pub struct ApiError(HomeCtlError);

impl From<HomeCtlError> for ApiError {
    fn from(err: HomeCtlError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            HomeCtlError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            HomeCtlError::Actuation(err) => {
                tracing::error!(error = %err, "actuation error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            HomeCtlError::Persistence(err) => {
                tracing::error!(error = %err, "persistence error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
