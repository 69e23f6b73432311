//! Core domain types shared across the character labeler workspace.
//!
//! A *vocabulary* describes what a user may pick, a *selection* records what
//! they picked, and *analysis results* carry the (mocked) vision features.
//! Loading, validating and composing these lives in `labeler-ops`.

mod lexicon;
mod options;
mod seed;
mod selector;

pub use lexicon::{
    analyzer_terms, translate_core_term, translate_extended_term, FEATURE_CATALOG,
    PRIORITY_KEYWORDS_EN, PRIORITY_KEYWORDS_ZH,
};
pub use options::{
    AnalysisMode, ConfigAction, ConfigScope, Language, OutputFormat, ParseOptionError,
    StylePreset, VocabularyKind,
};
pub use selector::{Selector, SelectorLevel};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// File stem of the persisted core vocabulary document.
pub const CORE_DOCUMENT: &str = "core_variables";

/// File stem of the persisted extended vocabulary document.
pub const EXTENDED_DOCUMENT: &str = "variable_variables";

// =============================================================================
// Vocabularies
// =============================================================================

/// Flat vocabulary: category → variable → ordered option list.
///
/// Option order is display order. Empty option lists are tolerated on disk but
/// never produce a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoreVocabulary {
    /// Categories in document order.
    pub categories: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl CoreVocabulary {
    /// Options declared for `category.variable`, if both exist.
    pub fn options(&self, category: &str, variable: &str) -> Option<&[String]> {
        self.categories
            .get(category)
            .and_then(|vars| vars.get(variable))
            .map(Vec::as_slice)
    }

    /// Whether `value` is listed for `category.variable`.
    pub fn admits(&self, category: &str, variable: &str, value: &str) -> bool {
        self.options(category, variable)
            .map(|opts| opts.iter().any(|o| o == value))
            .unwrap_or(false)
    }

    /// Number of variables across all categories.
    pub fn variable_count(&self) -> usize {
        self.categories.values().map(IndexMap::len).sum()
    }

    /// Number of options across all variables.
    pub fn option_count(&self) -> usize {
        self.categories
            .values()
            .flat_map(|vars| vars.values())
            .map(Vec::len)
            .sum()
    }
}

/// A two-tier option record: primary choices plus refinements keyed by primary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeveledOptions {
    /// Primary choices in display order.
    pub primary: Vec<String>,
    /// Secondary choices keyed by a primary choice. Empty for primary-only entries.
    pub secondary: IndexMap<String, Vec<String>>,
}

impl LeveledOptions {
    /// Entry without a secondary tier.
    pub fn primary_only(primary: Vec<String>) -> Self {
        Self {
            primary,
            secondary: IndexMap::new(),
        }
    }

    /// Whether any refinement is declared at all.
    pub fn has_secondary_tier(&self) -> bool {
        !self.secondary.is_empty()
    }

    /// Refinements available under `primary`; empty when none are declared.
    pub fn secondary_for(&self, primary: &str) -> &[String] {
        self.secondary
            .get(primary)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Secondary keys that do not name a primary choice.
    pub fn orphaned_secondary_keys(&self) -> Vec<&str> {
        self.secondary
            .keys()
            .filter(|key| !self.primary.contains(key))
            .map(String::as_str)
            .collect()
    }
}

// Accepts `{primary, secondary}`, the legacy `{一级, 二级}` spelling, and a bare
// list (primary-only).
impl<'de> Deserialize<'de> for LeveledOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flat(Vec<String>),
            Leveled {
                #[serde(alias = "一级")]
                primary: Vec<String>,
                #[serde(default, alias = "二级")]
                secondary: IndexMap<String, Vec<String>>,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Flat(primary) => LeveledOptions::primary_only(primary),
            Repr::Leveled { primary, secondary } => LeveledOptions { primary, secondary },
        })
    }
}

/// Two-tier vocabulary: category → sub-variable → [`LeveledOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtendedVocabulary {
    /// Categories in document order.
    pub categories: IndexMap<String, IndexMap<String, LeveledOptions>>,
}

impl ExtendedVocabulary {
    /// The leveled record for `category.variable`, if both exist.
    pub fn entry(&self, category: &str, variable: &str) -> Option<&LeveledOptions> {
        self.categories
            .get(category)
            .and_then(|vars| vars.get(variable))
    }

    /// Number of sub-variables across all categories.
    pub fn variable_count(&self) -> usize {
        self.categories.values().map(IndexMap::len).sum()
    }

    /// Number of primary options across all sub-variables.
    pub fn primary_option_count(&self) -> usize {
        self.categories
            .values()
            .flat_map(|vars| vars.values())
            .map(|entry| entry.primary.len())
            .sum()
    }

    /// `category.variable: key` for every secondary key missing from its primary list.
    pub fn inconsistencies(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (category, vars) in &self.categories {
            for (variable, entry) in vars {
                for key in entry.orphaned_secondary_keys() {
                    issues.push(format!("{}.{}: {}", category, variable, key));
                }
            }
        }
        issues
    }
}

// =============================================================================
// Selections
// =============================================================================

/// One chosen option per core variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoreSelections {
    /// category → variable → chosen option.
    pub categories: IndexMap<String, IndexMap<String, String>>,
}

impl CoreSelections {
    /// Record a choice, creating the category as needed.
    pub fn with(
        mut self,
        category: impl Into<String>,
        variable: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.insert(category, variable, value);
        self
    }

    /// Record a choice in place.
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        variable: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.categories
            .entry(category.into())
            .or_default()
            .insert(variable.into(), value.into());
    }

    /// Total number of chosen variables.
    pub fn variable_count(&self) -> usize {
        self.categories.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.variable_count() == 0
    }
}

/// A primary choice and its optional refinement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeveledChoice {
    /// Primary value; empty means "nothing chosen".
    #[serde(default, alias = "一级")]
    pub primary: String,
    /// Secondary value; empty means "no refinement".
    #[serde(default, alias = "二级")]
    pub secondary: String,
}

impl LeveledChoice {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn primary(primary: impl Into<String>) -> Self {
        Self::new(primary, "")
    }
}

/// Leveled choices per extended sub-variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtendedSelections {
    /// category → sub-variable → choice.
    pub categories: IndexMap<String, IndexMap<String, LeveledChoice>>,
}

impl ExtendedSelections {
    /// Record a choice, creating the category as needed.
    pub fn with(
        mut self,
        category: impl Into<String>,
        variable: impl Into<String>,
        choice: LeveledChoice,
    ) -> Self {
        self.insert(category, variable, choice);
        self
    }

    /// Record a choice in place.
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        variable: impl Into<String>,
        choice: LeveledChoice,
    ) {
        self.categories
            .entry(category.into())
            .or_default()
            .insert(variable.into(), choice);
    }

    /// Total number of chosen sub-variables.
    pub fn variable_count(&self) -> usize {
        self.categories.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.variable_count() == 0
    }
}

// =============================================================================
// Analysis Results
// =============================================================================

/// Score attached to a single detected feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// English alias used when composing in English.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    /// Feature category the term was drawn from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Language the feature key is written in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl FeatureScore {
    pub fn new(confidence: f64) -> Self {
        Self {
            confidence,
            english: None,
            category: None,
            language: None,
        }
    }

    pub fn with_english(mut self, english: impl Into<String>) -> Self {
        self.english = Some(english.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }
}

/// Feature label → score, in detection order. Ephemeral, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResults {
    pub features: IndexMap<String, FeatureScore>,
}

impl AnalysisResults {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn insert(&mut self, feature: impl Into<String>, score: FeatureScore) {
        self.features.insert(feature.into(), score);
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureScore> {
        self.features.get(feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureScore)> {
        self.features.iter()
    }
}

impl FromIterator<(String, FeatureScore)> for AnalysisResults {
    fn from_iter<I: IntoIterator<Item = (String, FeatureScore)>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leveled_options_accepts_all_spellings() {
        let leveled: LeveledOptions = serde_json::from_value(json!({
            "primary": ["微笑", "愤怒"],
            "secondary": { "微笑": ["大笑"] }
        }))
        .unwrap();
        assert_eq!(leveled.secondary_for("微笑"), ["大笑".to_string()]);

        let legacy: LeveledOptions = serde_json::from_value(json!({
            "一级": ["微笑", "愤怒"],
            "二级": { "微笑": ["大笑"] }
        }))
        .unwrap();
        assert_eq!(legacy, leveled);

        let flat: LeveledOptions = serde_json::from_value(json!(["晴天", "雨天"])).unwrap();
        assert_eq!(flat.primary.len(), 2);
        assert!(!flat.has_secondary_tier());
        assert!(flat.secondary_for("晴天").is_empty());
    }

    #[test]
    fn test_leveled_options_serializes_canonical_keys() {
        let entry = LeveledOptions::primary_only(vec!["春季".to_string()]);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({ "primary": ["春季"], "secondary": {} }));
    }

    #[test]
    fn test_inconsistencies_report_orphaned_keys() {
        let mut vocab = ExtendedVocabulary::default();
        let mut entry = LeveledOptions::primary_only(vec!["站立".to_string()]);
        entry
            .secondary
            .insert("飞行".to_string(), vec!["滑翔".to_string()]);
        vocab
            .categories
            .entry("state_action".to_string())
            .or_default()
            .insert("pose".to_string(), entry);

        assert_eq!(vocab.inconsistencies(), vec!["state_action.pose: 飞行"]);
    }

    #[test]
    fn test_core_vocabulary_counts_and_membership() {
        let vocab = CoreVocabulary::seed();
        assert_eq!(vocab.variable_count(), 9);
        assert!(vocab.admits("appearance", "hair_style", "长发"));
        assert!(!vocab.admits("appearance", "hair_style", "光头"));
        assert!(!vocab.admits("missing", "hair_style", "长发"));
    }

    #[test]
    fn test_selections_preserve_insertion_order() {
        let selections = CoreSelections::default()
            .with("characteristics", "gender", "女性")
            .with("appearance", "hair_style", "长发");
        let categories: Vec<_> = selections.categories.keys().cloned().collect();
        assert_eq!(categories, vec!["characteristics", "appearance"]);
        assert_eq!(selections.variable_count(), 2);
    }

    #[test]
    fn test_leveled_choice_defaults_missing_secondary() {
        let choice: LeveledChoice = serde_json::from_value(json!({ "一级": "微笑" })).unwrap();
        assert_eq!(choice, LeveledChoice::primary("微笑"));
    }
}
