//! API types and DTOs.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};

use labeler_ops::{OpsContext, OpsError};

/// Shared application state for the API.
pub struct ApiState {
    /// The operations context.
    pub ctx: OpsContext,
}

/// Response wrapper with timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data.
    pub data: T,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
}

impl<T> ApiResponse<T> {
    /// Create a new API response with current timestamp.
    pub fn new(data: T) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self { data, timestamp }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Feature analyzer in use.
    pub analyzer: String,
    /// Directory holding the vocabulary documents.
    pub config_dir: String,
}

/// Error response for operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

/// An operation failure rendered as a wrapped [`OpsErrorResponse`].
pub(crate) struct ApiError {
    status: StatusCode,
    body: OpsErrorResponse,
}

impl ApiError {
    /// Map an ops error, using `code` for anything that is not a bad argument.
    pub(crate) fn from_ops(code: &str, err: OpsError) -> Self {
        let (status, code) = match &err {
            OpsError::InvalidArgument { .. } => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, code),
        };
        Self {
            status,
            body: OpsErrorResponse {
                code: code.to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::new(self.body))).into_response()
    }
}
