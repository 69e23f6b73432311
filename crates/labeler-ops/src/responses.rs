//! Response DTOs for operations.
//!
//! Each response type contains all the data produced by an operation,
//! making it easy to consume from CLI, REST API, or programmatically.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use labeler_core::{
    AnalysisMode, AnalysisResults, ConfigAction, ConfigScope, CoreSelections, CoreVocabulary,
    ExtendedSelections, ExtendedVocabulary, Language, OutputFormat, Selector,
};

use crate::requests::Selections;

/// Core vocabulary with the selectors derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreVocabularyResponse {
    pub vocabulary: CoreVocabulary,
    pub selectors: Vec<Selector>,
    /// Document the vocabulary was read from.
    pub path: PathBuf,
}

/// Extended vocabulary with the selectors derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedVocabularyResponse {
    pub vocabulary: ExtendedVocabulary,
    pub selectors: Vec<Selector>,
    pub path: PathBuf,
}

/// Validated core choices and a one-line summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectCoreResponse {
    pub selections: CoreSelections,
    pub summary: String,
    /// `category.variable` keys removed by validation.
    #[serde(default)]
    pub dropped: Vec<String>,
}

/// Validated extended choices and a one-line summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectExtendedResponse {
    pub selections: ExtendedSelections,
    pub summary: String,
    #[serde(default)]
    pub dropped: Vec<String>,
}

/// Response from a validate operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub validated: Selections,
    #[serde(default)]
    pub dropped: Vec<String>,
}

impl ValidateResponse {
    /// Whether every input choice survived.
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Response from an image analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub results: AnalysisResults,
    pub summary: String,
    pub threshold: f64,
    pub mode: AnalysisMode,
    /// Which analyzer produced the scores.
    pub backend: String,
}

/// Per-category feature scores, independent of any threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub results: AnalysisResults,
    pub summary: String,
    pub language: Language,
    pub backend: String,
}

/// Response from a compose operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeResponse {
    /// Compact result; JSON text for the JSON format.
    pub raw: String,
    /// Display result; indented JSON for the JSON format.
    pub rendered: String,
    /// De-duplicated tags in source order.
    pub tags: Vec<String>,
    pub format: OutputFormat,
    pub language: Language,
}

/// Response from prompt-from-labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptResponse {
    pub prompt: String,
    /// Whether the prompt was cut to length.
    pub truncated: bool,
}

/// Response from a config-management action. Failures are reported here
/// rather than as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManageConfigResponse {
    pub action: ConfigAction,
    pub scope: ConfigScope,
    pub success: bool,
    /// Human-readable status report.
    pub report: String,
    /// Files written by the action.
    #[serde(default)]
    pub written: Vec<PathBuf>,
}
