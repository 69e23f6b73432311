//! Analyze command implementation.
//!
//! No real vision model exists yet: scores come from the mock analyzer.

use std::sync::Arc;

use anyhow::Result;

use labeler_core::{AnalysisMode, AnalysisResults, Language};
use labeler_ops::{AnalyzeRequest, Config, MockFeatureAnalyzer, OpsContext};

/// Build a context whose analyzer is seeded with `seed` when given.
pub fn context(config: Config, seed: Option<u64>) -> Result<OpsContext> {
    let ctx = OpsContext::new(config)?;
    Ok(match seed {
        Some(seed) => ctx.with_analyzer(Arc::new(MockFeatureAnalyzer::seeded(seed))),
        None => ctx,
    })
}

/// Score image catalog features above a threshold.
pub fn execute(
    ctx: &OpsContext,
    threshold: Option<f64>,
    mode: AnalysisMode,
    language: Option<Language>,
    json: bool,
) -> Result<()> {
    let mut request = AnalyzeRequest::new(mode);
    request.threshold = threshold;
    request.language = language;
    let response = ctx.analyze_image(request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("🔍 {}", response.summary);
    println!(
        "   backend: {}, threshold: {:.2}, mode: {:?}",
        response.backend, response.threshold, response.mode
    );
    print_results(&response.results);
    Ok(())
}

/// Score the per-category term lists.
pub fn survey(
    ctx: &OpsContext,
    language: Option<Language>,
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let response = ctx.survey_features(language, top);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("🔍 {}", response.summary);
    print_results(&response.results);
    Ok(())
}

fn print_results(results: &AnalysisResults) {
    for (feature, score) in results.iter() {
        let alias = score
            .english
            .as_deref()
            .or(score.category.as_deref())
            .map(|s| format!(" ({})", s))
            .unwrap_or_default();
        println!("   • {}{}: {:.2}", feature, alias, score.confidence);
    }
}
