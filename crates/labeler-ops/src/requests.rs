//! Request DTOs for operations.
//!
//! Each request type carries everything an operation needs, so the CLI, the
//! REST API and library callers all go through the same shapes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use labeler_core::{
    AnalysisMode, AnalysisResults, ConfigAction, ConfigScope, CoreSelections, ExtendedSelections,
    Language, OutputFormat, StylePreset, VocabularyKind,
};

use crate::analyzer::ImageInput;

/// Request to echo core choices back after validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectCoreRequest {
    #[serde(default)]
    pub selections: CoreSelections,
}

impl SelectCoreRequest {
    pub fn new(selections: CoreSelections) -> Self {
        Self { selections }
    }
}

/// Request to echo extended choices back after validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectExtendedRequest {
    #[serde(default)]
    pub selections: ExtendedSelections,
}

impl SelectExtendedRequest {
    pub fn new(selections: ExtendedSelections) -> Self {
        Self { selections }
    }
}

/// Selections of either kind, tagged with the vocabulary they target.
///
/// Serialized as `{"kind": "core", "selections": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "selections", rename_all = "snake_case")]
pub enum Selections {
    Core(CoreSelections),
    Extended(ExtendedSelections),
}

impl Selections {
    pub fn kind(&self) -> VocabularyKind {
        match self {
            Selections::Core(_) => VocabularyKind::Core,
            Selections::Extended(_) => VocabularyKind::Extended,
        }
    }

    /// Parse a bare selections document for `kind`.
    pub fn from_json(kind: VocabularyKind, json: &str) -> serde_json::Result<Self> {
        Ok(match kind {
            VocabularyKind::Core => Selections::Core(serde_json::from_str(json)?),
            VocabularyKind::Extended => Selections::Extended(serde_json::from_str(json)?),
        })
    }
}

/// Request to run mock image analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image: ImageInput,

    /// Minimum confidence to keep; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,

    #[serde(default)]
    pub mode: AnalysisMode,

    /// Summary language; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl AnalyzeRequest {
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }
}

/// Request to compose a label from selections, analysis and free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeRequest {
    #[serde(default)]
    pub core: CoreSelections,

    #[serde(default)]
    pub extended: ExtendedSelections,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResults>,

    /// Comma-separated extra tags.
    #[serde(default)]
    pub free_text: String,

    #[serde(default)]
    pub format: OutputFormat,

    /// Output language; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,

    /// Tag separator for list output; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    #[serde(default = "default_true")]
    pub include_analysis: bool,

    /// Filter selections through the stored vocabularies before composing.
    #[serde(default)]
    pub validate: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ComposeRequest {
    fn default() -> Self {
        Self {
            core: CoreSelections::default(),
            extended: ExtendedSelections::default(),
            analysis: None,
            free_text: String::new(),
            format: OutputFormat::default(),
            language: None,
            separator: None,
            include_analysis: true,
            validate: false,
        }
    }
}

impl ComposeRequest {
    pub fn new(core: CoreSelections, extended: ExtendedSelections) -> Self {
        Self {
            core,
            extended,
            ..Self::default()
        }
    }

    pub fn with_analysis(mut self, analysis: AnalysisResults) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn with_free_text(mut self, text: impl Into<String>) -> Self {
        self.free_text = text.into();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }
}

/// Request to turn a label string into a styled prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptRequest {
    pub labels: String,

    #[serde(default)]
    pub style: StylePreset,
}

impl PromptRequest {
    pub fn new(labels: impl Into<String>, style: StylePreset) -> Self {
        Self {
            labels: labels.into(),
            style,
        }
    }
}

/// Request to manage the stored vocabularies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManageConfigRequest {
    pub action: ConfigAction,

    #[serde(default)]
    pub scope: ConfigScope,

    /// Export destination; the config directory when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// JSON document for [`ConfigAction::Import`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl ManageConfigRequest {
    pub fn new(action: ConfigAction, scope: ConfigScope) -> Self {
        Self {
            action,
            scope,
            export_dir: None,
            payload: None,
        }
    }

    pub fn export_to(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}
