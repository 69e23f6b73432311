//! REST API service for the character labeler.
//!
//! Every endpoint is a thin adapter over [`labeler_ops::OpsContext`], so the
//! API and the CLI share one implementation.
//!
//! ## Endpoints
//!
//! - `GET  /health` - Liveness plus analyzer backend and config directory
//! - `GET  /vocabulary/core` - Core vocabulary with selectors
//! - `GET  /vocabulary/extended` - Extended vocabulary with selectors
//! - `POST /select/core` - Validate and summarize core choices
//! - `POST /select/extended` - Validate and summarize extended choices
//! - `POST /validate` - Validate `{kind, selections}`
//! - `POST /analyze` - Mock image analysis
//! - `GET  /analyze/survey?language=en&top=5` - Per-category feature scores
//! - `POST /compose` - Compose a label
//! - `POST /prompt` - Styled prompt from a label string
//! - `POST /config` - Vocabulary management (always 200, see `success`)
//!
//! Successful responses are wrapped as `{"data": ..., "timestamp": <ms>}`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use labeler_api::create_router;
//! use labeler_ops::{Config, OpsContext};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = OpsContext::new(Config::load()?)?;
//! let router = create_router(ctx);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

mod routes;
mod types;

pub use routes::create_router;
pub use types::{ApiResponse, ApiState, HealthResponse, OpsErrorResponse};
