//! Config command implementation.
//!
//! Wraps the vocabulary management actions and prints their report.

use std::path::PathBuf;

use anyhow::{Context, Result};

use labeler_core::{ConfigAction, ConfigScope};
use labeler_ops::{ManageConfigRequest, OpsContext};

/// Run a management action; a failed action exits with status 1.
pub fn execute(
    ctx: &OpsContext,
    action: ConfigAction,
    scope: ConfigScope,
    dir: Option<PathBuf>,
    file: Option<PathBuf>,
) -> Result<()> {
    let mut request = ManageConfigRequest::new(action, scope);
    request.export_dir = dir;
    if let Some(file) = file {
        let payload = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        request.payload = Some(payload);
    }

    let response = ctx.manage_config(request);
    if response.success {
        println!("{}", response.report);
        Ok(())
    } else {
        eprintln!("{}", response.report);
        std::process::exit(1);
    }
}
