//! API route handlers.

mod health;
mod ops;
mod vocabulary;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use labeler_ops::OpsContext;

use crate::types::ApiState;

/// Create the API router with all endpoints.
pub fn create_router(ctx: OpsContext) -> Router {
    let state = Arc::new(ApiState { ctx });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health::health_handler))
        // Vocabularies
        .route("/vocabulary/core", get(vocabulary::core_handler))
        .route("/vocabulary/extended", get(vocabulary::extended_handler))
        // Selections
        .route("/select/core", post(ops::select_core_handler))
        .route("/select/extended", post(ops::select_extended_handler))
        .route("/validate", post(ops::validate_handler))
        // Analysis and composition
        .route("/analyze", post(ops::analyze_handler))
        .route("/analyze/survey", get(ops::survey_handler))
        .route("/compose", post(ops::compose_handler))
        .route("/prompt", post(ops::prompt_handler))
        // Vocabulary management
        .route("/config", post(ops::config_handler))
        // Request tracing (enable with RUST_LOG=tower_http=info or higher)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
