//! Character Labeler Operations Layer
//!
//! This crate provides a typed API for every labeler operation. It is consumed
//! by both the CLI and the REST API, so both surfaces behave identically.
//!
//! ## Architecture
//!
//! - **Requests**: typed input DTOs for each operation
//! - **Responses**: typed output DTOs with all relevant data
//! - **OpsContext**: the service that executes operations
//!
//! Vocabularies live in a [`VocabularyStore`]; selections are filtered by the
//! [`validator`] functions; features come from a [`FeatureAnalyzer`] (only a
//! mock exists); labels are built by [`compose`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use labeler_core::{CoreSelections, ExtendedSelections};
//! use labeler_ops::{ComposeRequest, Config, OpsContext};
//!
//! fn main() -> Result<(), labeler_ops::OpsError> {
//!     let ctx = OpsContext::new(Config::load()?)?;
//!
//!     let core = CoreSelections::default().with("appearance", "hair_style", "长发");
//!     let request = ComposeRequest::new(core, ExtendedSelections::default())
//!         .with_free_text("red eyes");
//!     let response = ctx.compose(request)?;
//!
//!     println!("{}", response.rendered);
//!     Ok(())
//! }
//! ```

mod analyzer;
mod composer;
mod config;
mod context;
mod error;
mod requests;
mod responses;
mod store;
pub mod validator;

// Re-export public API
pub use analyzer::{
    filter_by_threshold, top_n, FeatureAnalyzer, ImageInput, MockFeatureAnalyzer,
    SUMMARY_LIMIT, TERMS_PER_CATEGORY,
};
pub use composer::{
    compose, prompt_from_labels, split_labels, ComposeOptions, Composition, LabelSources,
    ANALYSIS_TAG_THRESHOLD, PROMPT_TAG_LIMIT, STYLED_PROMPT_LIMIT,
};
pub use config::Config;
pub use context::OpsContext;
pub use error::{OpsError, OpsResult};
pub use requests::*;
pub use responses::*;
pub use store::{StoreStats, VocabularyBundle, VocabularyStore};
