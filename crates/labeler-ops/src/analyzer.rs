//! Feature analysis seam and its mock backend.
//!
//! No real vision model is wired in. [`FeatureAnalyzer`] is the contract a
//! CLIP-style backend would implement; [`MockFeatureAnalyzer`] fabricates
//! confidences from an injectable, seedable RNG. Callers may rely on the
//! shape of results only, never on their content.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use labeler_core::{
    analyzer_terms, AnalysisMode, AnalysisResults, FeatureScore, Language, FEATURE_CATALOG,
};

/// Terms scored per category by [`FeatureAnalyzer::analyze`].
pub const TERMS_PER_CATEGORY: usize = 3;

/// Features named in an [`FeatureAnalyzer::analyze`] summary.
pub const SUMMARY_LIMIT: usize = 5;

const CATEGORY_CONFIDENCE: (f64, f64) = (0.4, 0.95);
const IMAGE_CONFIDENCE: (f64, f64) = (0.5, 0.95);

/// Opaque reference to the image being analyzed.
///
/// The mock backend never inspects it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageInput {
    /// Where the host got the image from, if it cares to say.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Contract for anything that turns an image into scored features.
pub trait FeatureAnalyzer: Send + Sync {
    /// Score the first [`TERMS_PER_CATEGORY`] terms of every feature category.
    ///
    /// Returns the results and a sentence naming the first [`SUMMARY_LIMIT`].
    fn analyze(&self, language: Language) -> (AnalysisResults, String);

    /// Score the first `mode.feature_count()` catalog features, keeping those
    /// at or above `threshold`.
    fn analyze_image(
        &self,
        image: &ImageInput,
        threshold: f64,
        mode: AnalysisMode,
        language: Language,
    ) -> (AnalysisResults, String);

    /// Human-readable backend identifier.
    fn backend_name(&self) -> &str;
}

/// Random stand-in for a vision model.
pub struct MockFeatureAnalyzer {
    rng: Mutex<StdRng>,
}

impl MockFeatureAnalyzer {
    /// Reproducible analyzer.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Analyzer seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    fn draw(&self, (low, high): (f64, f64)) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(low..=high)
    }
}

impl FeatureAnalyzer for MockFeatureAnalyzer {
    fn analyze(&self, language: Language) -> (AnalysisResults, String) {
        let mut results = AnalysisResults::default();
        for (category, terms) in analyzer_terms(language) {
            for term in terms.iter().take(TERMS_PER_CATEGORY) {
                let score = FeatureScore::new(self.draw(CATEGORY_CONFIDENCE))
                    .with_category(*category)
                    .with_language(language);
                results.insert(*term, score);
            }
        }

        let summary = summarize(
            &results,
            SUMMARY_LIMIT,
            language,
            SummaryKind::Detected,
        );
        debug!(features = results.len(), "Mock analysis complete");
        (results, summary)
    }

    fn analyze_image(
        &self,
        _image: &ImageInput,
        threshold: f64,
        mode: AnalysisMode,
        language: Language,
    ) -> (AnalysisResults, String) {
        let scored: AnalysisResults = FEATURE_CATALOG
            .iter()
            .take(mode.feature_count())
            .map(|(zh, en)| {
                let score = FeatureScore::new(self.draw(IMAGE_CONFIDENCE))
                    .with_english(*en)
                    .with_language(Language::Chinese);
                (zh.to_string(), score)
            })
            .collect();

        let results = filter_by_threshold(&scored, threshold);
        let summary = summarize(&results, results.len(), language, SummaryKind::Result);
        debug!(
            scored = scored.len(),
            kept = results.len(),
            threshold,
            "Mock image analysis complete"
        );
        (results, summary)
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

/// Entries with confidence at or above `threshold`, in input order.
pub fn filter_by_threshold(results: &AnalysisResults, threshold: f64) -> AnalysisResults {
    results
        .iter()
        .filter(|(_, score)| score.confidence >= threshold)
        .map(|(feature, score)| (feature.clone(), score.clone()))
        .collect()
}

/// The `n` most confident entries; ties keep input order.
pub fn top_n(results: &AnalysisResults, n: usize) -> AnalysisResults {
    let mut entries: Vec<(&String, &FeatureScore)> = results.iter().collect();
    entries.sort_by(|a, b| b.1.confidence.total_cmp(&a.1.confidence));
    entries
        .into_iter()
        .take(n)
        .map(|(feature, score)| (feature.clone(), score.clone()))
        .collect()
}

enum SummaryKind {
    Detected,
    Result,
}

fn summarize(
    results: &AnalysisResults,
    limit: usize,
    language: Language,
    kind: SummaryKind,
) -> String {
    let prefix = match (kind, language) {
        (SummaryKind::Detected, Language::English) => "CLIP analysis detected: ",
        (SummaryKind::Detected, Language::Chinese) => "CLIP分析检测到: ",
        (SummaryKind::Result, Language::English) => "CLIP analysis result: ",
        (SummaryKind::Result, Language::Chinese) => "CLIP分析结果: ",
    };
    let (empty, terminal) = match language {
        Language::English => ("none", "."),
        Language::Chinese => ("无", "。"),
    };

    let listed: Vec<String> = results
        .iter()
        .take(limit)
        .map(|(feature, score)| format!("{}({:.2})", feature, score.confidence))
        .collect();
    let body = if listed.is_empty() {
        empty.to_string()
    } else {
        listed.join(", ")
    };

    format!("{}{}{}", prefix, body, terminal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> AnalysisResults {
        pairs
            .iter()
            .map(|(feature, confidence)| (feature.to_string(), FeatureScore::new(*confidence)))
            .collect()
    }

    #[test]
    fn test_analyze_shape() {
        let analyzer = MockFeatureAnalyzer::seeded(7);
        let (results, summary) = analyzer.analyze(Language::Chinese);

        assert_eq!(results.len(), 6 * TERMS_PER_CATEGORY);
        for (_, score) in results.iter() {
            assert!((0.4..=0.95).contains(&score.confidence));
            assert_eq!(score.language, Some(Language::Chinese));
            assert!(score.category.is_some());
        }
        assert!(results.get("长发").is_some());
        assert!(summary.starts_with("CLIP分析检测到: 长发("));
        assert!(summary.ends_with('。'));
        assert_eq!(summary.matches('(').count(), SUMMARY_LIMIT);
    }

    #[test]
    fn test_analyze_english_summary() {
        let analyzer = MockFeatureAnalyzer::seeded(7);
        let (results, summary) = analyzer.analyze(Language::English);

        assert!(results.get("long hair").is_some());
        assert_eq!(
            results.get("smiling").unwrap().category.as_deref(),
            Some("expression")
        );
        assert!(summary.starts_with("CLIP analysis detected: long hair("));
        assert!(summary.ends_with('.'));
    }

    #[test]
    fn test_same_seed_same_scores() {
        let (a, _) = MockFeatureAnalyzer::seeded(99).analyze(Language::English);
        let (b, _) = MockFeatureAnalyzer::seeded(99).analyze(Language::English);
        assert_eq!(a, b);
    }

    #[test]
    fn test_analyze_image_respects_mode_and_threshold() {
        let analyzer = MockFeatureAnalyzer::seeded(3);
        let image = ImageInput::default();

        let (all_fast, _) = analyzer.analyze_image(&image, 0.0, AnalysisMode::Fast, Language::Chinese);
        assert_eq!(all_fast.len(), 8);
        assert_eq!(all_fast.get("长发").unwrap().english.as_deref(), Some("long hair"));

        let (all_detailed, _) =
            analyzer.analyze_image(&image, 0.0, AnalysisMode::Detailed, Language::Chinese);
        assert_eq!(all_detailed.len(), 15);

        let (none, summary) = analyzer.analyze_image(&image, 0.99, AnalysisMode::Detailed, Language::English);
        assert!(none.is_empty());
        assert_eq!(summary, "CLIP analysis result: none.");
    }

    #[test]
    fn test_filter_by_threshold_is_inclusive() {
        let results = scores(&[("a", 0.5), ("b", 0.49), ("c", 0.9)]);
        let kept = filter_by_threshold(&results, 0.5);
        let keys: Vec<_> = kept.features.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_top_n_is_stable() {
        let results = scores(&[("a", 0.6), ("b", 0.8), ("c", 0.6), ("d", 0.7)]);
        let top = top_n(&results, 3);
        let keys: Vec<_> = top.features.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "d", "a"]);

        assert_eq!(top_n(&results, 10).len(), 4);
    }

    #[test]
    fn test_summary_formats_two_decimals() {
        let results = scores(&[("微笑", 0.876)]);
        let summary = summarize(&results, SUMMARY_LIMIT, Language::Chinese, SummaryKind::Detected);
        assert_eq!(summary, "CLIP分析检测到: 微笑(0.88)。");
    }
}
