//! Vocabulary endpoints for populating selection widgets.

use std::sync::Arc;

use axum::extract::State;

use labeler_ops::{CoreVocabularyResponse, ExtendedVocabularyResponse};

use crate::types::{ApiResponse, ApiState};

/// GET /vocabulary/core
pub async fn core_handler(State(state): State<Arc<ApiState>>) -> ApiResponse<CoreVocabularyResponse> {
    ApiResponse::new(state.ctx.core_vocabulary())
}

/// GET /vocabulary/extended
pub async fn extended_handler(
    State(state): State<Arc<ApiState>>,
) -> ApiResponse<ExtendedVocabularyResponse> {
    ApiResponse::new(state.ctx.extended_vocabulary())
}
