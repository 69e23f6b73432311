//! Compose and prompt command implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::de::DeserializeOwned;
use tracing::debug;

use labeler_core::{
    AnalysisMode, AnalysisResults, CoreSelections, ExtendedSelections, Language, OutputFormat,
    StylePreset,
};
use labeler_ops::{AnalyzeRequest, ComposeRequest, OpsContext, PromptRequest};

use super::select::{parse_core_picks, parse_extended_picks};

/// Arguments for `clabel compose`.
#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// JSON file with core selections.
    #[arg(long, value_name = "FILE")]
    pub core: Option<PathBuf>,

    /// JSON file with extended selections.
    #[arg(long, value_name = "FILE")]
    pub extended: Option<PathBuf>,

    /// JSON file with analysis results.
    #[arg(long, value_name = "FILE")]
    pub analysis: Option<PathBuf>,

    /// Core pick `category.variable=value` (added to --core).
    #[arg(short, long = "pick", value_name = "PICK")]
    pub picks: Vec<String>,

    /// Extended pick `category.variable=primary[/secondary]` (added to --extended).
    #[arg(short = 'x', long = "pick-ext", value_name = "PICK")]
    pub extended_picks: Vec<String>,

    /// Run the mock analyzer (fast mode, configured threshold) and use its results.
    #[arg(long, conflicts_with = "analysis")]
    pub analyze: bool,

    /// Extra comma-separated tags.
    #[arg(short, long, default_value = "")]
    pub text: String,

    /// list, detailed, json or prompt.
    #[arg(short, long, default_value = "list")]
    pub format: OutputFormat,

    /// Output language: zh or en.
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Separator for list output.
    #[arg(short, long)]
    pub separator: Option<String>,

    /// Leave analysis results out of the tags.
    #[arg(long)]
    pub no_analysis: bool,

    /// Filter selections through the stored vocabularies first.
    #[arg(long)]
    pub validate: bool,

    /// Print the raw result instead of the rendered one.
    #[arg(long)]
    pub raw: bool,
}

/// Compose a label and print it.
pub fn execute(ctx: &OpsContext, args: ComposeArgs) -> Result<()> {
    let mut core: CoreSelections = read_optional(args.core.as_deref())?;
    for (category, vars) in parse_core_picks(&args.picks)?.categories {
        for (variable, value) in vars {
            core.insert(category.clone(), variable, value);
        }
    }

    let mut extended: ExtendedSelections = read_optional(args.extended.as_deref())?;
    for (category, vars) in parse_extended_picks(&args.extended_picks)?.categories {
        for (variable, choice) in vars {
            extended.insert(category.clone(), variable, choice);
        }
    }

    let analysis: Option<AnalysisResults> = if args.analyze {
        Some(ctx.analyze_image(AnalyzeRequest::new(AnalysisMode::Fast))?.results)
    } else {
        match args.analysis.as_deref() {
            Some(path) => Some(read_json(path)?),
            None => None,
        }
    };

    let mut request = ComposeRequest::new(core, extended)
        .with_free_text(args.text)
        .with_format(args.format);
    request.analysis = analysis;
    request.language = args.language;
    request.separator = args.separator;
    request.include_analysis = !args.no_analysis;
    request.validate = args.validate;

    debug!(format = ?request.format, validate = request.validate, "Composing label");
    let response = ctx.compose(request)?;
    if args.raw {
        println!("{}", response.raw);
    } else {
        println!("{}", response.rendered);
    }
    Ok(())
}

/// Print a styled prompt.
pub fn prompt(ctx: &OpsContext, labels: String, style: StylePreset) {
    let response = ctx.prompt(PromptRequest::new(labels, style));
    println!("{}", response.prompt);
}

fn read_optional<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => read_json(path),
        None => Ok(T::default()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
}
