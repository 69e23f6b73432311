//! Configuration for the operations layer.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use labeler_core::Language;

use crate::error::{OpsError, OpsResult};

const ENV_CONFIG_DIR: &str = "LABELER_CONFIG_DIR";
const ENV_LANGUAGE: &str = "LABELER_LANGUAGE";
const ENV_SEPARATOR: &str = "LABELER_SEPARATOR";
const ENV_SEED: &str = "LABELER_SEED";
const ENV_SETTINGS_FILE: &str = "LABELER_SETTINGS_FILE";

/// Configuration for labeler operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the vocabulary documents.
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Default rendering language.
    #[serde(default)]
    pub language: Language,

    /// Default tag separator for list output.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Default confidence threshold for image analysis.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Seed for the mock analyzer; unseeded draws from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_seed: Option<u64>,
}

fn default_config_dir() -> PathBuf {
    ProjectDirs::from("com", "character-labeler", "labeler")
        .map(|dirs| dirs.config_dir().join("vocabularies"))
        .unwrap_or_else(|| PathBuf::from("configs"))
}

fn default_separator() -> String {
    ", ".to_string()
}

fn default_confidence_threshold() -> f64 {
    0.7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            language: Language::default(),
            separator: default_separator(),
            confidence_threshold: default_confidence_threshold(),
            analysis_seed: None,
        }
    }
}

impl Config {
    /// Configuration rooted at `config_dir` with every other field defaulted.
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from disk with environment overrides.
    pub fn load() -> OpsResult<Self> {
        Self::load_saved()?.apply_env()
    }

    /// Load only what the settings file holds, ignoring the environment.
    ///
    /// Use this when the result is going to be saved back.
    pub fn load_saved() -> OpsResult<Self> {
        match Self::settings_file_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)?;
                Ok(serde_json::from_str(&contents)?)
            }
            _ => Ok(Self::default()),
        }
    }

    fn apply_env(mut self) -> OpsResult<Self> {
        if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
            self.config_dir = PathBuf::from(dir);
        }
        if let Ok(language) = std::env::var(ENV_LANGUAGE) {
            self.language = language.parse()?;
        }
        if let Ok(separator) = std::env::var(ENV_SEPARATOR) {
            self.separator = separator;
        }
        if let Ok(seed) = std::env::var(ENV_SEED) {
            self.analysis_seed = Some(
                seed.parse()
                    .map_err(|_| OpsError::Config(format!("Invalid {}: {}", ENV_SEED, seed)))?,
            );
        }
        Ok(self)
    }

    /// Save configuration to disk.
    pub fn save(&self) -> OpsResult<()> {
        if let Some(path) = Self::settings_file_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&path, contents)?;
        }
        Ok(())
    }

    /// Get the path to the settings file (`LABELER_SETTINGS_FILE` overrides).
    pub fn settings_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(ENV_SETTINGS_FILE) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("com", "character-labeler", "labeler")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "config_dir" => Some(self.config_dir.display().to_string()),
            "language" => Some(self.language.to_string()),
            "separator" => Some(self.separator.clone()),
            "confidence_threshold" => Some(self.confidence_threshold.to_string()),
            "analysis_seed" => self.analysis_seed.map(|s| s.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key.
    pub fn set(&mut self, key: &str, value: &str) -> OpsResult<()> {
        match key {
            "config_dir" => {
                self.config_dir = PathBuf::from(value);
            }
            "language" => {
                self.language = value.parse()?;
            }
            "separator" => {
                self.separator = value.to_string();
            }
            "confidence_threshold" => {
                let threshold: f64 = value
                    .parse()
                    .map_err(|_| OpsError::Config(format!("Invalid number: {}", value)))?;
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(OpsError::Config(format!(
                        "Threshold must be within [0, 1]: {}",
                        value
                    )));
                }
                self.confidence_threshold = threshold;
            }
            "analysis_seed" => {
                self.analysis_seed = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(
                        value
                            .parse()
                            .map_err(|_| OpsError::Config(format!("Invalid seed: {}", value)))?,
                    )
                };
            }
            _ => {
                return Err(OpsError::Config(format!("Unknown config key: {}", key)));
            }
        }
        Ok(())
    }

    /// Keys accepted by [`Config::get`] and [`Config::set`].
    pub fn keys() -> &'static [&'static str] {
        &[
            "config_dir",
            "language",
            "separator",
            "confidence_threshold",
            "analysis_seed",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_round_trip() {
        let mut config = Config::with_config_dir("/tmp/vocab");
        config.set("language", "英文").unwrap();
        config.set("separator", " | ").unwrap();
        config.set("analysis_seed", "42").unwrap();

        assert_eq!(config.get("language").as_deref(), Some("en"));
        assert_eq!(config.get("separator").as_deref(), Some(" | "));
        assert_eq!(config.analysis_seed, Some(42));
        assert_eq!(config.get("config_dir").as_deref(), Some("/tmp/vocab"));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("confidence_threshold", "1.5").is_err());
        assert!(config.set("confidence_threshold", "abc").is_err());
        assert!(config.set("language", "klingon").is_err());
        assert!(config.set("nonsense", "1").is_err());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{ "language": "en" }"#).unwrap();
        assert_eq!(config.language, Language::English);
        assert_eq!(config.separator, ", ");
        assert_eq!(config.confidence_threshold, 0.7);
    }
}
