//! OpsContext - The main service for executing operations.
//!
//! The OpsContext owns the configuration, the vocabulary store and the feature
//! analyzer, and exposes every host-facing operation. It is constructed
//! explicitly and passed to whoever needs it; there is no global instance.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use humansize::{format_size, DECIMAL};
use tracing::{debug, info, warn};

use labeler_core::{ConfigAction, ConfigScope, CoreSelections, ExtendedSelections, Language};

use crate::analyzer::{top_n, FeatureAnalyzer, MockFeatureAnalyzer};
use crate::composer::{compose, prompt_from_labels, ComposeOptions, LabelSources, STYLED_PROMPT_LIMIT};
use crate::config::Config;
use crate::error::{OpsError, OpsResult};
use crate::requests::*;
use crate::responses::*;
use crate::store::VocabularyStore;
use crate::validator::{dropped_keys, validate_core, validate_extended};

/// The main operations context.
///
/// Cheap to clone; clones share the analyzer.
#[derive(Clone)]
pub struct OpsContext {
    /// Configuration for operations.
    pub config: Config,
    store: VocabularyStore,
    analyzer: Arc<dyn FeatureAnalyzer>,
}

impl fmt::Debug for OpsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpsContext")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("analyzer", &self.analyzer.backend_name())
            .finish()
    }
}

impl OpsContext {
    /// Create a context, opening (and seeding) the store under `config.config_dir`.
    ///
    /// The analyzer is the mock, seeded from `config.analysis_seed` when set.
    pub fn new(config: Config) -> OpsResult<Self> {
        let store = VocabularyStore::open(&config.config_dir)?;
        let analyzer = Arc::new(MockFeatureAnalyzer::from_seed_option(config.analysis_seed));
        Ok(Self {
            config,
            store,
            analyzer,
        })
    }

    /// Create a context from the on-disk settings and environment.
    pub fn default_config() -> OpsResult<Self> {
        Self::new(Config::load()?)
    }

    /// Replace the feature analyzer.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn FeatureAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn store(&self) -> &VocabularyStore {
        &self.store
    }

    /// Name of the active feature analyzer.
    pub fn backend_name(&self) -> &str {
        self.analyzer.backend_name()
    }

    fn language(&self, requested: Option<Language>) -> Language {
        requested.unwrap_or(self.config.language)
    }

    // =========================================================================
    // Vocabulary Operations
    // =========================================================================

    /// Current core vocabulary and its selectors.
    pub fn core_vocabulary(&self) -> CoreVocabularyResponse {
        let vocabulary = self.store.load_core();
        CoreVocabularyResponse {
            selectors: vocabulary.selectors(),
            vocabulary,
            path: self.store.core_path(),
        }
    }

    /// Current extended vocabulary and its selectors.
    pub fn extended_vocabulary(&self) -> ExtendedVocabularyResponse {
        let vocabulary = self.store.load_extended();
        ExtendedVocabularyResponse {
            selectors: vocabulary.selectors(),
            vocabulary,
            path: self.store.extended_path(),
        }
    }

    // =========================================================================
    // Selection Operations
    // =========================================================================

    /// Validate core choices and summarize what survived.
    pub fn select_core(&self, request: SelectCoreRequest) -> SelectCoreResponse {
        let selections = validate_core(&request.selections, &self.store.load_core());
        let dropped = dropped_keys(&request.selections.categories, &selections.categories);
        if !dropped.is_empty() {
            debug!(dropped = ?dropped, "Core selections filtered");
        }

        SelectCoreResponse {
            summary: core_summary(&selections),
            selections,
            dropped,
        }
    }

    /// Validate extended choices and summarize what survived.
    pub fn select_extended(&self, request: SelectExtendedRequest) -> SelectExtendedResponse {
        let selections = validate_extended(&request.selections, &self.store.load_extended());
        let dropped = dropped_keys(&request.selections.categories, &selections.categories);
        if !dropped.is_empty() {
            debug!(dropped = ?dropped, "Extended selections filtered");
        }

        SelectExtendedResponse {
            summary: extended_summary(&selections),
            selections,
            dropped,
        }
    }

    /// Filter selections of either kind against the stored vocabulary.
    pub fn validate(&self, selections: Selections) -> ValidateResponse {
        match selections {
            Selections::Core(input) => {
                let validated = validate_core(&input, &self.store.load_core());
                ValidateResponse {
                    dropped: dropped_keys(&input.categories, &validated.categories),
                    validated: Selections::Core(validated),
                }
            }
            Selections::Extended(input) => {
                let validated = validate_extended(&input, &self.store.load_extended());
                ValidateResponse {
                    dropped: dropped_keys(&input.categories, &validated.categories),
                    validated: Selections::Extended(validated),
                }
            }
        }
    }

    // =========================================================================
    // Analysis Operations
    // =========================================================================

    /// Score catalog features for an image and keep those above the threshold.
    pub fn analyze_image(&self, request: AnalyzeRequest) -> OpsResult<AnalyzeResponse> {
        let threshold = request.threshold.unwrap_or(self.config.confidence_threshold);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(OpsError::invalid("threshold", threshold.to_string()));
        }
        let language = self.language(request.language);

        let (results, summary) =
            self.analyzer
                .analyze_image(&request.image, threshold, request.mode, language);
        info!(
            backend = self.analyzer.backend_name(),
            features = results.len(),
            threshold,
            "Analyzed image"
        );

        Ok(AnalyzeResponse {
            results,
            summary,
            threshold,
            mode: request.mode,
            backend: self.analyzer.backend_name().to_string(),
        })
    }

    /// Score the per-category term lists, optionally keeping only the `top` best.
    pub fn survey_features(&self, language: Option<Language>, top: Option<usize>) -> SurveyResponse {
        let language = self.language(language);
        let (mut results, summary) = self.analyzer.analyze(language);
        if let Some(n) = top {
            results = top_n(&results, n);
        }

        SurveyResponse {
            results,
            summary,
            language,
            backend: self.analyzer.backend_name().to_string(),
        }
    }

    // =========================================================================
    // Composition Operations
    // =========================================================================

    /// Compose a label from selections, analysis results and free text.
    pub fn compose(&self, request: ComposeRequest) -> OpsResult<ComposeResponse> {
        let (core, extended) = if request.validate {
            (
                validate_core(&request.core, &self.store.load_core()),
                validate_extended(&request.extended, &self.store.load_extended()),
            )
        } else {
            (request.core, request.extended)
        };

        let options = ComposeOptions {
            format: request.format,
            language: self.language(request.language),
            separator: request
                .separator
                .unwrap_or_else(|| self.config.separator.clone()),
            include_analysis: request.include_analysis,
        };
        let sources = LabelSources {
            core: &core,
            extended: &extended,
            analysis: request.analysis.as_ref(),
            free_text: &request.free_text,
        };

        let composition = compose(sources, &options)?;
        info!(
            format = ?options.format,
            language = %options.language,
            tags = composition.tags.len(),
            "Composed labels"
        );

        Ok(ComposeResponse {
            raw: composition.raw,
            rendered: composition.rendered,
            tags: composition.tags,
            format: options.format,
            language: options.language,
        })
    }

    /// Prefix a label string with a style preamble.
    pub fn prompt(&self, request: PromptRequest) -> PromptResponse {
        let prompt = prompt_from_labels(&request.labels, request.style);
        PromptResponse {
            truncated: prompt.chars().count() > STYLED_PROMPT_LIMIT,
            prompt,
        }
    }

    // =========================================================================
    // Configuration Management
    // =========================================================================

    /// Run a management action. Never fails: errors become the report.
    pub fn manage_config(&self, request: ManageConfigRequest) -> ManageConfigResponse {
        let mut written = Vec::new();
        let outcome = self.run_config_action(&request, &mut written);

        let (success, report) = match outcome {
            Ok(body) => (true, format!("{}\n\n{}", body, self.paths_footer())),
            Err(e) => {
                warn!(action = ?request.action, error = %e, "Configuration management failed");
                (false, format!("❌ Configuration management failed: {}", e))
            }
        };

        ManageConfigResponse {
            action: request.action,
            scope: request.scope,
            success,
            report,
            written,
        }
    }

    fn run_config_action(
        &self,
        request: &ManageConfigRequest,
        written: &mut Vec<PathBuf>,
    ) -> OpsResult<String> {
        let scope = request.scope;
        let mut lines = Vec::new();

        match request.action {
            ConfigAction::Reload => {
                self.store.init()?;
                lines.push("✅ Configuration reloaded".to_string());
                if scope.includes_core() {
                    let core = self.store.load_core();
                    lines.push(format!(
                        "📊 Core vocabulary loaded: {} variables",
                        core.variable_count()
                    ));
                }
                if scope.includes_extended() {
                    let extended = self.store.load_extended();
                    lines.push(format!(
                        "🎭 Extended vocabulary loaded: {} variables",
                        extended.variable_count()
                    ));
                }
            }
            ConfigAction::Export => {
                let dir = request
                    .export_dir
                    .clone()
                    .unwrap_or_else(|| self.store.config_dir().to_path_buf());
                for path in self.store.export_to(&dir, scope)? {
                    lines.push(format!("📤 Exported to: {}", path.display()));
                    written.push(path);
                }
            }
            ConfigAction::Reset => {
                if scope.includes_core() {
                    written.push(self.store.reset_core()?);
                    lines.push("🔄 Core vocabulary reset to defaults".to_string());
                }
                if scope.includes_extended() {
                    written.push(self.store.reset_extended()?);
                    lines.push("🔄 Extended vocabulary reset to defaults".to_string());
                }
            }
            ConfigAction::Inspect => {
                lines.extend(self.inspect_lines(scope));
            }
            ConfigAction::Import => {
                let payload = request
                    .payload
                    .as_deref()
                    .ok_or_else(|| OpsError::Config("Import requires a JSON payload".to_string()))?;
                for path in self.store.import(scope, payload)? {
                    lines.push(format!("📥 Imported: {}", path.display()));
                    written.push(path);
                }
            }
        }

        info!(action = ?request.action, scope = ?scope, files = written.len(), "Configuration action complete");
        Ok(lines.join("\n"))
    }

    fn inspect_lines(&self, scope: ConfigScope) -> Vec<String> {
        let stats = self.store.stats();
        let size = |bytes: Option<u64>| {
            bytes
                .map(|b| format_size(b, DECIMAL))
                .unwrap_or_else(|| "missing".to_string())
        };
        let mut lines = Vec::new();

        if scope.includes_core() {
            lines.push(format!("📋 Core vocabulary ({}):", size(stats.core_bytes)));
            for (category, vars) in &self.store.load_core().categories {
                lines.push(format!("  {}:", category));
                for (variable, options) in vars {
                    lines.push(format!("    - {}: {} options", variable, options.len()));
                }
            }
        }
        if scope.includes_extended() {
            lines.push(format!("📋 Extended vocabulary ({}):", size(stats.extended_bytes)));
            for (category, vars) in &self.store.load_extended().categories {
                lines.push(format!("  {}:", category));
                for (variable, entry) in vars {
                    lines.push(format!(
                        "    - {}: {} primary options",
                        variable,
                        entry.primary.len()
                    ));
                }
            }
        }
        lines
    }

    fn paths_footer(&self) -> String {
        format!(
            "📁 Configuration files:\n  Core: {}\n  Extended: {}",
            self.store.core_path().display(),
            self.store.extended_path().display()
        )
    }
}

/// `核心变量: hair_style: 长发，eye_color: 红色`
fn core_summary(selections: &CoreSelections) -> String {
    let parts: Vec<String> = selections
        .categories
        .values()
        .flat_map(|vars| vars.iter())
        .filter(|(_, value)| !value.is_empty())
        .map(|(variable, value)| format!("{}: {}", variable, value))
        .collect();
    format!("核心变量: {}", parts.join("，"))
}

/// `可变变量: expression: 微笑(大笑)，pose: 站立`
fn extended_summary(selections: &ExtendedSelections) -> String {
    let parts: Vec<String> = selections
        .categories
        .values()
        .flat_map(|vars| vars.iter())
        .filter(|(_, choice)| !choice.primary.is_empty())
        .map(|(variable, choice)| {
            if choice.secondary.is_empty() {
                format!("{}: {}", variable, choice.primary)
            } else {
                format!("{}: {}({})", variable, choice.primary, choice.secondary)
            }
        })
        .collect();
    format!("可变变量: {}", parts.join("，"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use labeler_core::{
        AnalysisMode, AnalysisResults, CoreVocabulary, ExtendedVocabulary, FeatureScore,
        LeveledChoice, OutputFormat, StylePreset, VocabularyKind,
    };
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> OpsContext {
        let mut config = Config::with_config_dir(dir.path().join("vocab"));
        config.analysis_seed = Some(11);
        OpsContext::new(config).unwrap()
    }

    #[test]
    fn test_new_seeds_store() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let core = ctx.core_vocabulary();
        assert_eq!(core.vocabulary, CoreVocabulary::seed());
        assert!(core.path.exists());
        assert!(!core.selectors.is_empty());

        let extended = ctx.extended_vocabulary();
        assert_eq!(extended.vocabulary, ExtendedVocabulary::seed());
        assert!(extended.selectors.iter().any(|s| s.key == "state_action_expression_level1"));
    }

    #[test]
    fn test_select_core_summarizes_and_reports_dropped() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let response = ctx.select_core(SelectCoreRequest::new(
            CoreSelections::default()
                .with("appearance", "hair_style", "长发")
                .with("appearance", "eye_color", "红色")
                .with("appearance", "hair_color", "彩虹"),
        ));

        assert_eq!(response.summary, "核心变量: hair_style: 长发，eye_color: 红色");
        assert_eq!(response.dropped, vec!["appearance.hair_color"]);
    }

    #[test]
    fn test_select_extended_summary() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let response = ctx.select_extended(SelectExtendedRequest::new(
            ExtendedSelections::default()
                .with("state_action", "expression", LeveledChoice::new("微笑", "大笑"))
                .with("state_action", "pose", LeveledChoice::primary("站立")),
        ));
        assert_eq!(response.summary, "可变变量: expression: 微笑(大笑)，pose: 站立");
        assert!(response.dropped.is_empty());
    }

    #[test]
    fn test_validate_dispatches_by_kind() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let response = ctx.validate(Selections::Core(
            CoreSelections::default().with("nowhere", "x", "y"),
        ));
        assert_eq!(response.validated.kind(), VocabularyKind::Core);
        assert_eq!(response.dropped, vec!["nowhere.x"]);
        assert!(!response.is_clean());
    }

    #[test]
    fn test_analyze_image_uses_configured_threshold() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let response = ctx
            .analyze_image(AnalyzeRequest::new(AnalysisMode::Detailed))
            .unwrap();
        assert_eq!(response.threshold, 0.7);
        assert_eq!(response.backend, "mock");
        assert!(response.results.iter().all(|(_, s)| s.confidence >= 0.7));

        let bad = ctx.analyze_image(AnalyzeRequest::default().with_threshold(1.5));
        assert!(matches!(bad, Err(OpsError::InvalidArgument { .. })));
    }

    #[test]
    fn test_survey_top_n() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let response = ctx.survey_features(Some(Language::English), Some(4));
        assert_eq!(response.results.len(), 4);
        let confidences: Vec<f64> = response.results.iter().map(|(_, s)| s.confidence).collect();
        assert!(confidences.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_compose_uses_config_defaults() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        ctx.config.language = Language::English;
        ctx.config.separator = " / ".to_string();

        let request = ComposeRequest::new(
            CoreSelections::default().with("appearance", "hair_style", "长发"),
            ExtendedSelections::default(),
        )
        .with_free_text("red eyes");
        let response = ctx.compose(request.clone()).unwrap();
        assert_eq!(response.raw, "long hair / red eyes");
        assert_eq!(response.language, Language::English);

        let chinese = ctx
            .compose(request.with_language(Language::Chinese).with_separator(", "))
            .unwrap();
        assert_eq!(chinese.raw, "长发, red eyes");
    }

    #[test]
    fn test_compose_can_validate_first() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let mut request = ComposeRequest::new(
            CoreSelections::default()
                .with("appearance", "hair_style", "长发")
                .with("appearance", "eye_color", "彩虹"),
            ExtendedSelections::default(),
        )
        .with_format(OutputFormat::TagList);
        assert_eq!(ctx.compose(request.clone()).unwrap().raw, "长发, 彩虹");

        request.validate = true;
        assert_eq!(ctx.compose(request).unwrap().raw, "长发");
    }

    #[test]
    fn test_compose_json_drops_excluded_analysis() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let analysis: AnalysisResults = [("长发".to_string(), FeatureScore::new(0.9))]
            .into_iter()
            .collect();

        let mut request = ComposeRequest::new(CoreSelections::default(), ExtendedSelections::default())
            .with_analysis(analysis)
            .with_format(OutputFormat::Json);
        request.include_analysis = false;

        let response = ctx.compose(request).unwrap();
        let document: serde_json::Value = serde_json::from_str(&response.raw).unwrap();
        assert_eq!(document["clip_analysis"], serde_json::json!({}));
        assert_eq!(document["summary"]["clip_tags_count"], 0);
    }

    #[test]
    fn test_prompt_reports_truncation() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let short = ctx.prompt(PromptRequest::new("a, b", StylePreset::Anime));
        assert_eq!(short.prompt, "anime style, a, b");
        assert!(!short.truncated);

        let long = ctx.prompt(PromptRequest::new("x".repeat(400), StylePreset::Normal));
        assert!(long.truncated);
    }

    #[test]
    fn test_reset_recreates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        std::fs::remove_dir_all(dir.path().join("vocab")).unwrap();

        let response = ctx.manage_config(ManageConfigRequest::new(ConfigAction::Reset, ConfigScope::Both));

        assert!(response.success, "{}", response.report);
        assert_eq!(response.written.len(), 2);
        assert!(response.report.contains("🔄 Core vocabulary reset to defaults"));
        assert!(response.report.contains("📁 Configuration files:"));
        assert_eq!(ctx.store().load_core(), CoreVocabulary::seed());
        assert_eq!(ctx.store().load_extended(), ExtendedVocabulary::seed());
    }

    #[test]
    fn test_export_and_inspect() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let out = dir.path().join("out");

        let export = ctx.manage_config(
            ManageConfigRequest::new(ConfigAction::Export, ConfigScope::Core).export_to(&out),
        );
        assert!(export.success);
        assert_eq!(export.written, vec![out.join("core_variables.json")]);

        let inspect = ctx.manage_config(ManageConfigRequest::new(ConfigAction::Inspect, ConfigScope::Extended));
        assert!(inspect.report.starts_with("📋 Extended vocabulary ("));
        assert!(inspect.report.contains("    - expression: "));
        assert!(!inspect.report.contains("📋 Core vocabulary"));
    }

    #[test]
    fn test_failures_become_reports() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let export = ctx.manage_config(
            ManageConfigRequest::new(ConfigAction::Export, ConfigScope::Both).export_to(&blocker),
        );
        assert!(!export.success);
        assert!(export.report.starts_with("❌ Configuration management failed: "));

        let import = ctx.manage_config(ManageConfigRequest::new(ConfigAction::Import, ConfigScope::Core));
        assert!(!import.success);
        assert!(import.report.contains("payload"));
    }

    #[test]
    fn test_import_replaces_document() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let response = ctx.manage_config(
            ManageConfigRequest::new(ConfigAction::Import, ConfigScope::Core)
                .with_payload(r#"{"weapons": {"sword": ["长剑", "短剑"]}}"#),
        );
        assert!(response.success, "{}", response.report);
        let core = ctx.core_vocabulary().vocabulary;
        assert_eq!(core.options("weapons", "sword").unwrap().len(), 2);
        assert!(core.options("appearance", "hair_style").is_none());
    }
}
