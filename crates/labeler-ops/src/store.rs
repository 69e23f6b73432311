//! Vocabulary persistence.
//!
//! The store owns two JSON documents in its config directory and always reads
//! and writes them whole. Each write goes to its own uniquely named temporary
//! file in the same directory that is then persisted over the target, so
//! readers never see a half-written document.
//! There is no cross-process lock: concurrent writers race and the last rename
//! wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use labeler_core::{ConfigScope, CoreVocabulary, ExtendedVocabulary, CORE_DOCUMENT, EXTENDED_DOCUMENT};

use crate::error::{OpsError, OpsResult};

/// Document payload accepted by [`VocabularyStore::import`] for [`ConfigScope::Both`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_variables: Option<CoreVocabulary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_variables: Option<ExtendedVocabulary>,
}

/// Store manages the vocabulary documents under a config directory.
#[derive(Debug, Clone)]
pub struct VocabularyStore {
    config_dir: PathBuf,
}

impl VocabularyStore {
    /// Open a store, creating the directory and seeding any missing document.
    pub fn open(config_dir: impl AsRef<Path>) -> OpsResult<Self> {
        let store = Self {
            config_dir: config_dir.as_ref().to_path_buf(),
        };
        store.init()?;
        Ok(store)
    }

    /// Idempotently create the config directory and seed missing documents.
    pub fn init(&self) -> OpsResult<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
            debug!(path = %self.config_dir.display(), "Created config directory");
        }

        if !self.core_path().exists() {
            write_document(&self.core_path(), &CoreVocabulary::seed())?;
            info!(path = %self.core_path().display(), "Seeded default core vocabulary");
        }
        if !self.extended_path().exists() {
            write_document(&self.extended_path(), &ExtendedVocabulary::seed())?;
            info!(path = %self.extended_path().display(), "Seeded default extended vocabulary");
        }

        Ok(())
    }

    /// Get the config directory.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the core vocabulary document.
    pub fn core_path(&self) -> PathBuf {
        document_path(&self.config_dir, CORE_DOCUMENT)
    }

    /// Path of the extended vocabulary document.
    pub fn extended_path(&self) -> PathBuf {
        document_path(&self.config_dir, EXTENDED_DOCUMENT)
    }

    /// Load the core vocabulary, falling back to the seed on any failure.
    pub fn load_core(&self) -> CoreVocabulary {
        self.load_or_seed(&self.core_path(), CoreVocabulary::seed)
    }

    /// Load the extended vocabulary, falling back to the seed on any failure.
    pub fn load_extended(&self) -> ExtendedVocabulary {
        let vocab = self.load_or_seed(&self.extended_path(), ExtendedVocabulary::seed);
        let issues = vocab.inconsistencies();
        if !issues.is_empty() {
            warn!(
                path = %self.extended_path().display(),
                issues = ?issues,
                "Secondary options keyed by values missing from their primary list"
            );
        }
        vocab
    }

    fn load_or_seed<T>(&self, path: &Path, seed: fn() -> T) -> T
    where
        T: DeserializeOwned + Serialize,
    {
        if !path.exists() {
            let value = seed();
            match write_document(path, &value) {
                Ok(()) => info!(path = %path.display(), "Vocabulary missing, wrote default"),
                Err(e) => warn!(path = %path.display(), error = %e, "Could not write default vocabulary"),
            }
            return value;
        }

        match read_document(path) {
            Ok(value) => {
                debug!(path = %path.display(), "Loaded vocabulary");
                value
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load vocabulary, using default");
                seed()
            }
        }
    }

    /// Replace the core vocabulary document.
    pub fn save_core(&self, vocab: &CoreVocabulary) -> OpsResult<PathBuf> {
        let path = self.core_path();
        write_document(&path, vocab)?;
        info!(path = %path.display(), variables = vocab.variable_count(), "Saved core vocabulary");
        Ok(path)
    }

    /// Replace the extended vocabulary document.
    pub fn save_extended(&self, vocab: &ExtendedVocabulary) -> OpsResult<PathBuf> {
        let path = self.extended_path();
        write_document(&path, vocab)?;
        info!(path = %path.display(), variables = vocab.variable_count(), "Saved extended vocabulary");
        Ok(path)
    }

    /// Overwrite the core document with the seed, discarding customizations.
    pub fn reset_core(&self) -> OpsResult<PathBuf> {
        self.save_core(&CoreVocabulary::seed())
    }

    /// Overwrite the extended document with the seed, discarding customizations.
    pub fn reset_extended(&self) -> OpsResult<PathBuf> {
        self.save_extended(&ExtendedVocabulary::seed())
    }

    /// Write the current vocabularies in `scope` into `dir` as pretty JSON.
    pub fn export_to(&self, dir: &Path, scope: ConfigScope) -> OpsResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        if scope.includes_core() {
            let path = document_path(dir, CORE_DOCUMENT);
            write_document(&path, &self.load_core()).map_err(|e| export_error(&path, e))?;
            written.push(path);
        }
        if scope.includes_extended() {
            let path = document_path(dir, EXTENDED_DOCUMENT);
            write_document(&path, &self.load_extended()).map_err(|e| export_error(&path, e))?;
            written.push(path);
        }

        info!(dir = %dir.display(), files = written.len(), "Exported vocabularies");
        Ok(written)
    }

    /// Replace the documents in `scope` with the JSON in `payload`.
    ///
    /// `Core` and `Extended` expect the bare vocabulary; `Both` expects a
    /// [`VocabularyBundle`] with at least one member.
    pub fn import(&self, scope: ConfigScope, payload: &str) -> OpsResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        match scope {
            ConfigScope::Core => {
                let vocab: CoreVocabulary = serde_json::from_str(payload)?;
                written.push(self.save_core(&vocab)?);
            }
            ConfigScope::Extended => {
                let vocab: ExtendedVocabulary = serde_json::from_str(payload)?;
                written.push(self.save_extended(&vocab)?);
            }
            ConfigScope::Both => {
                let bundle: VocabularyBundle = serde_json::from_str(payload)?;
                if bundle.core_variables.is_none() && bundle.variable_variables.is_none() {
                    return Err(OpsError::Config(format!(
                        "Import payload has neither {} nor {}",
                        CORE_DOCUMENT, EXTENDED_DOCUMENT
                    )));
                }
                if let Some(core) = &bundle.core_variables {
                    written.push(self.save_core(core)?);
                }
                if let Some(extended) = &bundle.variable_variables {
                    written.push(self.save_extended(extended)?);
                }
            }
        }
        Ok(written)
    }

    /// Get storage statistics.
    pub fn stats(&self) -> StoreStats {
        let size = |path: &Path| std::fs::metadata(path).ok().map(|m| m.len());
        let core_path = self.core_path();
        let extended_path = self.extended_path();
        StoreStats {
            core_bytes: size(&core_path),
            extended_bytes: size(&extended_path),
            core_path,
            extended_path,
        }
    }
}

/// Statistics about the stored documents.
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub core_path: PathBuf,
    pub extended_path: PathBuf,
    /// Size of the core document, if it exists.
    pub core_bytes: Option<u64>,
    /// Size of the extended document, if it exists.
    pub extended_bytes: Option<u64>,
}

fn document_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{}.json", stem))
}

fn export_error(path: &Path, err: OpsError) -> OpsError {
    OpsError::Export {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> OpsResult<T> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> OpsResult<()> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let json = serde_json::to_string_pretty(value)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory_and_seeds() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("configs");

        let store = VocabularyStore::open(&dir).unwrap();

        assert!(store.core_path().exists());
        assert!(store.extended_path().exists());
        assert_eq!(store.load_core(), CoreVocabulary::seed());
        assert_eq!(store.load_extended(), ExtendedVocabulary::seed());
    }

    #[test]
    fn test_open_is_idempotent_and_keeps_customizations() {
        let temp = TempDir::new().unwrap();
        let store = VocabularyStore::open(temp.path()).unwrap();

        let mut custom = CoreVocabulary::default();
        custom
            .categories
            .entry("appearance".to_string())
            .or_default()
            .insert("hair_style".to_string(), vec!["光头".to_string()]);
        store.save_core(&custom).unwrap();

        let reopened = VocabularyStore::open(temp.path()).unwrap();
        assert_eq!(reopened.load_core(), custom);
    }

    #[test]
    fn test_corrupt_document_degrades_to_seed_without_overwriting() {
        let temp = TempDir::new().unwrap();
        let store = VocabularyStore::open(temp.path()).unwrap();
        std::fs::write(store.core_path(), "{ not json").unwrap();

        assert_eq!(store.load_core(), CoreVocabulary::seed());
        let on_disk = std::fs::read_to_string(store.core_path()).unwrap();
        assert_eq!(on_disk, "{ not json");
    }

    #[test]
    fn test_missing_document_is_rewritten_on_load() {
        let temp = TempDir::new().unwrap();
        let store = VocabularyStore::open(temp.path()).unwrap();
        std::fs::remove_file(store.extended_path()).unwrap();

        assert_eq!(store.load_extended(), ExtendedVocabulary::seed());
        assert!(store.extended_path().exists());
    }

    #[test]
    fn test_documents_are_pretty_and_unescaped() {
        let temp = TempDir::new().unwrap();
        let store = VocabularyStore::open(temp.path()).unwrap();
        let json = std::fs::read_to_string(store.core_path()).unwrap();

        assert!(json.contains("\n  \"appearance\": {"));
        assert!(json.contains("长发"));
        assert!(!store.config_dir().join("core_variables.json.tmp").exists());
    }

    #[test]
    fn test_legacy_extended_document_loads() {
        let temp = TempDir::new().unwrap();
        let store = VocabularyStore::open(temp.path()).unwrap();
        std::fs::write(
            store.extended_path(),
            r#"{
  "state_action": {
    "expression": { "一级": ["微笑"], "二级": { "微笑": ["大笑"] } }
  },
  "additional": { "season": ["春季", "夏季"] }
}"#,
        )
        .unwrap();

        let vocab = store.load_extended();
        let expression = vocab.entry("state_action", "expression").unwrap();
        assert_eq!(expression.secondary_for("微笑"), ["大笑".to_string()]);
        assert_eq!(vocab.entry("additional", "season").unwrap().primary.len(), 2);
    }

    #[test]
    fn test_reset_restores_seed() {
        let temp = TempDir::new().unwrap();
        let store = VocabularyStore::open(temp.path()).unwrap();
        store.save_extended(&ExtendedVocabulary::default()).unwrap();

        store.reset_extended().unwrap();
        assert_eq!(store.load_extended(), ExtendedVocabulary::seed());
    }

    #[test]
    fn test_export_writes_scope_documents() {
        let temp = TempDir::new().unwrap();
        let store = VocabularyStore::open(temp.path().join("cfg")).unwrap();
        let out = temp.path().join("out");

        let written = store.export_to(&out, ConfigScope::Core).unwrap();
        assert_eq!(written, vec![out.join("core_variables.json")]);
        assert!(!out.join("variable_variables.json").exists());
    }

    #[test]
    fn test_export_to_unwritable_target_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = VocabularyStore::open(temp.path().join("cfg")).unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let err = store.export_to(&blocker, ConfigScope::Both).unwrap_err();
        assert!(matches!(err, OpsError::Export { .. }));
    }

    #[test]
    fn test_import_bundle_requires_a_member() {
        let temp = TempDir::new().unwrap();
        let store = VocabularyStore::open(temp.path()).unwrap();

        assert!(store.import(ConfigScope::Both, "{}").is_err());

        let written = store
            .import(
                ConfigScope::Both,
                r#"{ "core_variables": { "appearance": { "hair_style": ["光头"] } } }"#,
            )
            .unwrap();
        assert_eq!(written.len(), 1);
        assert!(store.load_core().admits("appearance", "hair_style", "光头"));
    }

    #[test]
    fn test_concurrent_writers_never_publish_partial_documents() {
        let temp = TempDir::new().unwrap();
        let store = VocabularyStore::open(temp.path()).unwrap();
        let seed = CoreVocabulary::seed();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        store.save_core(&seed).unwrap();
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..100 {
                    let json = std::fs::read_to_string(store.core_path()).unwrap();
                    let parsed: CoreVocabulary = serde_json::from_str(&json).unwrap();
                    assert_eq!(parsed, seed);
                }
            });
        });

        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension().map_or(true, |ext| ext != "json"))
            .collect();
        assert!(leftovers.is_empty(), "stray temporary files: {:?}", leftovers);
    }
}
