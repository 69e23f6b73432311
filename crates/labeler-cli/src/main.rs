//! clabel - compose character labels and prompts from curated vocabularies.
//!
//! Vocabularies live as JSON documents in a config directory; every command
//! goes through the shared operations layer.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use labeler_core::{
    AnalysisMode, ConfigAction, ConfigScope, Language, OutputFormat, StylePreset, VocabularyKind,
};
use labeler_ops::{Config, OpsContext};

mod commands;

use commands::{analyze, compose, manage, select, serve, settings, vocab};

/// clabel - character labels and prompts from curated vocabularies.
#[derive(Parser, Debug)]
#[command(
    name = "clabel",
    author,
    version,
    about = "Compose character labels and prompts from curated vocabularies",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Vocabulary directory (overrides settings and LABELER_CONFIG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the stored vocabularies.
    Vocab {
        /// Which vocabulary: core, extended or both.
        #[arg(short, long, default_value = "both")]
        scope: ConfigScope,

        /// List widget selectors instead of the option tree.
        #[arg(long)]
        selectors: bool,

        /// Print JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate picks and print the selection summary.
    Select {
        /// Vocabulary to select from: core or extended.
        kind: VocabularyKind,

        /// `category.variable=value`; extended values may be `primary/secondary`.
        #[arg(short, long = "pick", value_name = "PICK")]
        picks: Vec<String>,

        /// Print JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate a selections document against a vocabulary.
    Validate {
        /// Vocabulary to validate against: core or extended.
        kind: VocabularyKind,

        /// JSON file holding the selections.
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Run the (mock) feature analyzer.
    Analyze {
        /// Minimum confidence to keep (defaults to the configured threshold).
        #[arg(short, long)]
        threshold: Option<f64>,

        /// fast (8 features) or detailed (15 features).
        #[arg(short, long, default_value = "fast")]
        mode: AnalysisMode,

        /// Summary language: zh or en.
        #[arg(short, long)]
        language: Option<Language>,

        /// Seed for reproducible scores.
        #[arg(long)]
        seed: Option<u64>,

        /// Score the per-category term lists instead of the image catalog.
        #[arg(long)]
        categories: bool,

        /// With --categories, keep only the N most confident features.
        #[arg(long, requires = "categories")]
        top: Option<usize>,

        /// Print JSON.
        #[arg(long)]
        json: bool,
    },

    /// Compose a label from selections, analysis and free text.
    Compose(compose::ComposeArgs),

    /// Turn a comma-separated label string into a styled prompt.
    Prompt {
        /// Labels, comma-separated.
        labels: String,

        /// normal, anime, realistic or detailed.
        #[arg(short, long, default_value = "normal")]
        style: StylePreset,
    },

    /// Manage the vocabulary documents.
    Config {
        /// reload, export, reset, inspect or import.
        action: ConfigAction,

        /// core, extended or both.
        #[arg(short, long, default_value = "both")]
        scope: ConfigScope,

        /// Export destination (defaults to the config directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// JSON document to import.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Manage CLI settings.
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Serve the REST API.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
}

/// Settings subcommands.
#[derive(Subcommand, Debug)]
enum SettingsCommands {
    /// Show current settings.
    Show,

    /// Set a setting.
    Set {
        /// Setting key.
        key: String,
        /// Setting value.
        value: String,
    },

    /// Get a setting.
    Get {
        /// Setting key.
        key: String,
    },

    /// Reset settings to defaults.
    Reset,

    /// Show path to the settings file.
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Environment and --config-dir apply to this run only; settings
    // subcommands work on the saved file so overrides never get persisted.
    let config_dir = cli.config_dir;
    let load_config = || -> Result<Config> {
        let mut config = Config::load()?;
        if let Some(dir) = &config_dir {
            config.config_dir = dir.clone();
        }
        Ok(config)
    };

    match cli.command {
        Commands::Vocab {
            scope,
            selectors,
            json,
        } => {
            let ctx = OpsContext::new(load_config()?)?;
            vocab::execute(&ctx, scope, selectors, json)?;
        }

        Commands::Select { kind, picks, json } => {
            let ctx = OpsContext::new(load_config()?)?;
            select::execute(&ctx, kind, &picks, json)?;
        }

        Commands::Validate { kind, file } => {
            let ctx = OpsContext::new(load_config()?)?;
            select::validate_file(&ctx, kind, &file)?;
        }

        Commands::Analyze {
            threshold,
            mode,
            language,
            seed,
            categories,
            top,
            json,
        } => {
            let ctx = analyze::context(load_config()?, seed)?;
            if categories {
                analyze::survey(&ctx, language, top, json)?;
            } else {
                analyze::execute(&ctx, threshold, mode, language, json)?;
            }
        }

        Commands::Compose(args) => {
            let ctx = OpsContext::new(load_config()?)?;
            compose::execute(&ctx, args)?;
        }

        Commands::Prompt { labels, style } => {
            let ctx = OpsContext::new(load_config()?)?;
            compose::prompt(&ctx, labels, style);
        }

        Commands::Config {
            action,
            scope,
            dir,
            file,
        } => {
            let ctx = OpsContext::new(load_config()?)?;
            manage::execute(&ctx, action, scope, dir, file)?;
        }

        Commands::Settings(command) => match command {
            SettingsCommands::Show => settings::show(&Config::load_saved()?),
            SettingsCommands::Set { key, value } => {
                settings::set(&mut Config::load_saved()?, &key, &value)?
            }
            SettingsCommands::Get { key } => settings::get(&Config::load_saved()?, &key)?,
            SettingsCommands::Reset => settings::reset()?,
            SettingsCommands::Path => match Config::settings_file_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("(no settings file path available)"),
            },
        },

        Commands::Serve { port } => {
            let ctx = OpsContext::new(load_config()?)?;
            serve::execute(ctx, port).await?;
        }
    }

    Ok(())
}
