//! Operation endpoints.
//!
//! These mirror the CLI commands but are designed for programmatic access.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use labeler_core::Language;

use labeler_ops::{
    AnalyzeRequest, ComposeRequest, ManageConfigRequest, PromptRequest, SelectCoreRequest,
    SelectExtendedRequest, Selections,
};

use crate::types::{ApiError, ApiResponse, ApiState};

/// POST /select/core - Validate and summarize core choices.
pub async fn select_core_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SelectCoreRequest>,
) -> impl IntoResponse {
    ApiResponse::new(state.ctx.select_core(request))
}

/// POST /select/extended - Validate and summarize extended choices.
pub async fn select_extended_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SelectExtendedRequest>,
) -> impl IntoResponse {
    ApiResponse::new(state.ctx.select_extended(request))
}

/// POST /validate - Filter `{kind, selections}` against the stored vocabulary.
pub async fn validate_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<Selections>,
) -> impl IntoResponse {
    let response = state.ctx.validate(request);
    info!(
        kind = ?response.validated.kind(),
        dropped = response.dropped.len(),
        "Validated selections"
    );
    ApiResponse::new(response)
}

/// POST /analyze - Mock image analysis.
pub async fn analyze_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    match state.ctx.analyze_image(request) {
        Ok(response) => ApiResponse::new(response).into_response(),
        Err(e) => {
            error!("Analysis failed: {}", e);
            ApiError::from_ops("ANALYZE_ERROR", e).into_response()
        }
    }
}

/// Query parameters for the survey endpoint.
#[derive(Debug, Deserialize)]
pub struct SurveyQuery {
    /// Term language (`zh` or `en`).
    #[serde(default)]
    pub language: Option<Language>,
    /// Keep only the N most confident features.
    #[serde(default)]
    pub top: Option<usize>,
}

/// GET /analyze/survey - Score the per-category feature terms.
pub async fn survey_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SurveyQuery>,
) -> impl IntoResponse {
    ApiResponse::new(state.ctx.survey_features(query.language, query.top))
}

/// POST /compose - Compose a label.
pub async fn compose_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ComposeRequest>,
) -> impl IntoResponse {
    match state.ctx.compose(request) {
        Ok(response) => ApiResponse::new(response).into_response(),
        Err(e) => {
            error!("Composition failed: {}", e);
            ApiError::from_ops("COMPOSE_ERROR", e).into_response()
        }
    }
}

/// POST /prompt - Styled prompt from a label string.
pub async fn prompt_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<PromptRequest>,
) -> impl IntoResponse {
    ApiResponse::new(state.ctx.prompt(request))
}

/// POST /config - Vocabulary management. Failures are reported in the body.
pub async fn config_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ManageConfigRequest>,
) -> impl IntoResponse {
    let response = state.ctx.manage_config(request);
    info!(
        action = ?response.action,
        success = response.success,
        "Configuration request handled"
    );
    ApiResponse::new(response)
}
