//! Settings command implementation.
//!
//! Manages the persisted CLI settings.

use anyhow::Result;

use labeler_ops::Config;

/// Show current settings.
pub fn show(config: &Config) {
    println!("Character Labeler Settings");
    println!("{:-<40}", "");

    println!("Vocabulary Directory: {}", config.config_dir.display());
    println!("Language:             {}", config.language);
    println!("Separator:            {:?}", config.separator);
    println!("Confidence Threshold: {}", config.confidence_threshold);
    println!(
        "Analysis Seed:        {}",
        config
            .analysis_seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "(random)".to_string())
    );

    if let Some(path) = Config::settings_file_path() {
        println!("\nSettings file: {}", path.display());
    }
}

/// Set a setting and save.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let key = key.replace('-', "_");
    config.set(&key, value).map_err(|e| {
        anyhow::anyhow!("{}. Valid keys: {}", e, Config::keys().join(", "))
    })?;
    config.save()?;
    println!("✅ Set {} to: {}", key, value);
    Ok(())
}

/// Print a setting.
pub fn get(config: &Config, key: &str) -> Result<()> {
    let key = key.replace('-', "_");
    if !Config::keys().contains(&key.as_str()) {
        anyhow::bail!("Unknown setting: {}", key);
    }
    println!(
        "{}",
        config.get(&key).unwrap_or_else(|| "(not set)".to_string())
    );
    Ok(())
}

/// Reset settings to defaults.
pub fn reset() -> Result<()> {
    Config::default().save()?;
    println!("Settings reset to defaults");
    Ok(())
}
