//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;

use crate::types::{ApiResponse, ApiState, HealthResponse};

/// Handler for GET /health
pub async fn health_handler(State(state): State<Arc<ApiState>>) -> ApiResponse<HealthResponse> {
    ApiResponse::new(HealthResponse {
        status: "ok".to_string(),
        analyzer: state.ctx.backend_name().to_string(),
        config_dir: state.ctx.store().config_dir().display().to_string(),
    })
}
