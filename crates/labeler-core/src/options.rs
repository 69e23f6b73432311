//! Small closed enums that select behavior: language, output format, presets,
//! analysis mode and configuration-management verbs.
//!
//! Each parses from the English keyword, a short alias, and the Chinese label
//! the node UI historically used.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string names none of an enum's variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptionError {
    /// Which option was being parsed (e.g. "language").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseOptionError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseOptionError {}

/// Rendering language for tags and summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh", alias = "中文", alias = "chinese", alias = "cn")]
    Chinese,
    #[serde(rename = "en", alias = "英文", alias = "english")]
    English,
}

impl Language {
    pub fn is_english(&self) -> bool {
        matches!(self, Language::English)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Chinese => "zh",
            Language::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "cn" | "chinese" | "中文" => Ok(Self::Chinese),
            "en" | "english" | "英文" => Ok(Self::English),
            _ => Err(ParseOptionError::new("language", s)),
        }
    }
}

/// Output format of a composition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Tags joined with the caller's separator.
    #[default]
    #[serde(alias = "list", alias = "标签列表")]
    TagList,
    /// Labeled prose sections.
    #[serde(alias = "description", alias = "详细描述")]
    Detailed,
    /// Structured JSON document with metadata and counts.
    #[serde(alias = "JSON格式")]
    Json,
    /// Priority-ordered prompt, at most 20 tags.
    #[serde(alias = "提示词格式")]
    Prompt,
}

impl FromStr for OutputFormat {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" | "tags" | "tag_list" | "tag-list" | "标签列表" => Ok(Self::TagList),
            "detailed" | "description" | "详细描述" => Ok(Self::Detailed),
            "json" | "json格式" => Ok(Self::Json),
            "prompt" | "提示词格式" => Ok(Self::Prompt),
            _ => Err(ParseOptionError::new("output format", s)),
        }
    }
}

/// Style preamble prepended by prompt-from-labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    #[default]
    Normal,
    Anime,
    Realistic,
    Detailed,
}

impl StylePreset {
    /// Preamble text, including its trailing separator.
    pub fn preamble(&self) -> &'static str {
        match self {
            StylePreset::Normal => "",
            StylePreset::Anime => "anime style, ",
            StylePreset::Realistic => "photorealistic, ",
            StylePreset::Detailed => "masterpiece, best quality, ultra-detailed, ",
        }
    }
}

// Unknown presets mean "no preamble".
impl FromStr for StylePreset {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "anime" => Self::Anime,
            "realistic" => Self::Realistic,
            "detailed" => Self::Detailed,
            _ => Self::Normal,
        })
    }
}

/// How many catalog features the image analyzer scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    #[serde(alias = "快速分析")]
    Fast,
    #[serde(alias = "详细分析")]
    Detailed,
}

impl AnalysisMode {
    pub fn feature_count(&self) -> usize {
        match self {
            AnalysisMode::Fast => 8,
            AnalysisMode::Detailed => 15,
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" | "快速分析" => Ok(Self::Fast),
            "detailed" | "详细分析" => Ok(Self::Detailed),
            _ => Err(ParseOptionError::new("analysis mode", s)),
        }
    }
}

/// Which vocabulary a selection is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyKind {
    Core,
    Extended,
}

impl FromStr for VocabularyKind {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "core" | "核心变量" => Ok(Self::Core),
            "extended" | "variable" | "可变变量" => Ok(Self::Extended),
            _ => Err(ParseOptionError::new("vocabulary kind", s)),
        }
    }
}

/// Which vocabulary documents a management action touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigScope {
    #[serde(alias = "核心变量")]
    Core,
    #[serde(alias = "可变变量")]
    Extended,
    #[default]
    #[serde(alias = "all", alias = "全部")]
    Both,
}

impl ConfigScope {
    pub fn includes_core(&self) -> bool {
        matches!(self, ConfigScope::Core | ConfigScope::Both)
    }

    pub fn includes_extended(&self) -> bool {
        matches!(self, ConfigScope::Extended | ConfigScope::Both)
    }
}

impl FromStr for ConfigScope {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "core" | "核心变量" => Ok(Self::Core),
            "extended" | "可变变量" => Ok(Self::Extended),
            "both" | "all" | "全部" => Ok(Self::Both),
            _ => Err(ParseOptionError::new("config scope", s)),
        }
    }
}

/// Configuration-management verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigAction {
    #[serde(alias = "重新加载配置")]
    Reload,
    #[serde(alias = "导出配置")]
    Export,
    #[serde(alias = "reset_to_default", alias = "重置为默认")]
    Reset,
    #[serde(alias = "查看配置")]
    Inspect,
    Import,
}

impl FromStr for ConfigAction {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reload" | "重新加载配置" => Ok(Self::Reload),
            "export" | "导出配置" => Ok(Self::Export),
            "reset" | "reset-to-default" | "重置为默认" => Ok(Self::Reset),
            "inspect" | "show" | "查看配置" => Ok(Self::Inspect),
            "import" => Ok(Self::Import),
            _ => Err(ParseOptionError::new("config action", s)),
        }
    }
}
