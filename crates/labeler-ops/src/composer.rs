//! Label composition: tag extraction, de-duplication and rendering.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::json;

use labeler_core::{
    translate_core_term, translate_extended_term, AnalysisResults, CoreSelections,
    ExtendedSelections, Language, OutputFormat, StylePreset, PRIORITY_KEYWORDS_EN,
    PRIORITY_KEYWORDS_ZH,
};

use crate::error::OpsResult;

/// Minimum confidence for an analysis feature to become a tag.
pub const ANALYSIS_TAG_THRESHOLD: f64 = 0.5;

/// Maximum number of tags in prompt-format output.
pub const PROMPT_TAG_LIMIT: usize = 20;

/// Maximum characters of a styled prompt before it is cut and marked.
pub const STYLED_PROMPT_LIMIT: usize = 300;

const GENERATOR: &str = "ComfyUI Character Labeler";
const FORMAT_VERSION: &str = "1.0.0";

/// Everything a composition draws tags from.
#[derive(Debug, Clone, Copy)]
pub struct LabelSources<'a> {
    pub core: &'a CoreSelections,
    pub extended: &'a ExtendedSelections,
    pub analysis: Option<&'a AnalysisResults>,
    pub free_text: &'a str,
}

/// How a composition is rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeOptions {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_include_analysis")]
    pub include_analysis: bool,
}

fn default_separator() -> String {
    ", ".to_string()
}

fn default_include_analysis() -> bool {
    true
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            language: Language::default(),
            separator: default_separator(),
            include_analysis: default_include_analysis(),
        }
    }
}

/// Output of [`compose`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    /// Machine-facing result: compact JSON for the JSON format, else the label text.
    pub raw: String,
    /// Human-facing result: pretty JSON for the JSON format, else the label text.
    pub rendered: String,
    /// De-duplicated tags in source order.
    pub tags: Vec<String>,
}

/// Tags per source, before merging.
#[derive(Debug, Default)]
struct ExtractedTags {
    core: Vec<String>,
    extended: Vec<String>,
    analysis: Vec<String>,
    free_text: Vec<String>,
}

impl ExtractedTags {
    fn merged(&self) -> Vec<String> {
        let unique: IndexSet<&String> = self
            .core
            .iter()
            .chain(&self.extended)
            .chain(&self.analysis)
            .chain(&self.free_text)
            .filter(|tag| !tag.is_empty())
            .collect();
        unique.into_iter().cloned().collect()
    }
}

/// Merge every tag source and render it in `options.format`.
pub fn compose(sources: LabelSources<'_>, options: &ComposeOptions) -> OpsResult<Composition> {
    let language = options.language;
    // Excluded analysis is absent everywhere, the JSON document included.
    let sources = LabelSources {
        analysis: sources.analysis.filter(|_| options.include_analysis),
        ..sources
    };
    let extracted = ExtractedTags {
        core: core_tags(sources.core, language),
        extended: extended_tags(sources.extended, language),
        analysis: sources
            .analysis
            .map(|analysis| analysis_tags(analysis, language))
            .unwrap_or_default(),
        free_text: split_labels(sources.free_text),
    };
    let tags = extracted.merged();

    let (raw, rendered) = match options.format {
        OutputFormat::TagList => {
            let text = tags.join(&options.separator);
            (text.clone(), text)
        }
        OutputFormat::Detailed => {
            let text = detailed_description(&extracted, language);
            (text.clone(), text)
        }
        OutputFormat::Json => {
            let document = json_document(&sources, &extracted.free_text);
            (
                serde_json::to_string(&document)?,
                serde_json::to_string_pretty(&document)?,
            )
        }
        OutputFormat::Prompt => {
            let text = prioritized(&tags, language).join(", ");
            (text.clone(), text)
        }
    };

    Ok(Composition {
        raw,
        rendered,
        tags,
    })
}

/// Prefix a comma-separated label string with a style preamble.
///
/// Results longer than [`STYLED_PROMPT_LIMIT`] characters are cut there and
/// suffixed with `...`.
pub fn prompt_from_labels(labels: &str, style: StylePreset) -> String {
    let prompt = format!("{}{}", style.preamble(), split_labels(labels).join(", "));
    if prompt.chars().count() > STYLED_PROMPT_LIMIT {
        let cut: String = prompt.chars().take(STYLED_PROMPT_LIMIT).collect();
        format!("{}...", cut)
    } else {
        prompt
    }
}

/// Split on commas, trim, and drop empty fragments.
pub fn split_labels(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

fn core_tags(core: &CoreSelections, language: Language) -> Vec<String> {
    core.categories
        .values()
        .flat_map(|choices| choices.values())
        .filter(|value| !value.is_empty())
        .map(|value| match language {
            Language::English => translate_core_term(value).to_string(),
            Language::Chinese => value.clone(),
        })
        .collect()
}

fn extended_tags(extended: &ExtendedSelections, language: Language) -> Vec<String> {
    extended
        .categories
        .values()
        .flat_map(|choices| choices.values())
        .filter(|choice| !choice.primary.is_empty())
        .map(|choice| match (language, choice.secondary.is_empty()) {
            (Language::English, true) => translate_extended_term(&choice.primary).to_string(),
            (Language::English, false) => format!(
                "{} ({})",
                translate_extended_term(&choice.primary),
                translate_extended_term(&choice.secondary)
            ),
            (Language::Chinese, true) => choice.primary.clone(),
            (Language::Chinese, false) => format!("{}({})", choice.primary, choice.secondary),
        })
        .collect()
}

fn analysis_tags(analysis: &AnalysisResults, language: Language) -> Vec<String> {
    analysis
        .iter()
        .filter(|(_, score)| score.confidence >= ANALYSIS_TAG_THRESHOLD)
        .map(|(feature, score)| match language {
            Language::English => score.english.clone().unwrap_or_else(|| feature.clone()),
            Language::Chinese => feature.clone(),
        })
        .collect()
}

fn detailed_description(extracted: &ExtractedTags, language: Language) -> String {
    let (labels, joiner, terminal) = match language {
        Language::English => (
            ["Character", "State & Environment", "AI Analysis", "Additional"],
            ". ",
            ".",
        ),
        Language::Chinese => (["人物特征", "状态环境", "AI分析", "附加描述"], "。", "。"),
    };
    let lists = [
        &extracted.core,
        &extracted.extended,
        &extracted.analysis,
        &extracted.free_text,
    ]
    .map(|tags| tags.join(", "));

    let sections: Vec<String> = labels
        .iter()
        .zip(lists.iter())
        .filter(|(_, body)| !body.is_empty())
        .map(|(label, body)| format!("{}: {}", label, body))
        .collect();

    format!("{}{}", sections.join(joiner), terminal)
}

fn json_document(sources: &LabelSources<'_>, free_text: &[String]) -> serde_json::Value {
    let analysis_count = sources.analysis.map(AnalysisResults::len).unwrap_or(0);
    json!({
        "metadata": {
            "generator": GENERATOR,
            "timestamp": chrono::Local::now().to_rfc3339(),
            "version": FORMAT_VERSION,
        },
        "core_variables": sources.core,
        "variable_variables": sources.extended,
        "clip_analysis": sources.analysis.cloned().unwrap_or_default(),
        "additional_tags": free_text,
        "summary": {
            "core_tags_count": sources.core.variable_count(),
            "variable_tags_count": sources.extended.variable_count(),
            "clip_tags_count": analysis_count,
            "additional_tags_count": free_text.len(),
        },
    })
}

/// Move tags containing a priority keyword to the front, keyword by keyword,
/// then cap at [`PROMPT_TAG_LIMIT`].
fn prioritized(tags: &[String], language: Language) -> Vec<String> {
    let keywords = match language {
        Language::English => PRIORITY_KEYWORDS_EN,
        Language::Chinese => PRIORITY_KEYWORDS_ZH,
    };

    let mut ordered: IndexSet<&String> = IndexSet::with_capacity(tags.len());
    for keyword in keywords {
        let keyword = keyword.to_lowercase();
        for tag in tags {
            if tag.to_lowercase().contains(&keyword) {
                ordered.insert(tag);
            }
        }
    }
    ordered.extend(tags);

    ordered
        .into_iter()
        .take(PROMPT_TAG_LIMIT)
        .cloned()
        .collect()
}
