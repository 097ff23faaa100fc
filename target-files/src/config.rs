//! The target files config: which file every NLU item belongs in.
//!
//! On disk the config is a YAML document:
//!
//! ```yaml
//! nlu_data_path: data/nlu
//! default_target_files:
//!   intents: data/nlu/nlu.yml
//!   synonyms: data/nlu/nlu.yml
//!   regexes: data/nlu/nlu.yml
//!   lookups: data/nlu/nlu.yml
//! target_files:
//!   intents:
//!     greet: data/nlu/general.yml
//!   synonyms: {}
//!   regexes: {}
//!   lookups: {}
//! ```

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use nlu_training_data::{CategoryKeys, ItemCategory, PerCategory};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Result, StorageError, TargetFilesError};
use crate::paths::relative_to_cwd;
use crate::target_map::TargetFileMap;

/// Default NLU data directory.
pub const NLU_DATA_PATH: &str = "data/nlu";

/// Default target file for items without an explicit target.
pub const DEFAULT_NLU_TARGET_FILE: &str = "data/nlu/nlu.yml";

/// Default location of the target files config.
pub const TARGET_FILES_CONFIG_FILE: &str = "nlu_target_files.yml";

/// Item → target file assignments, one mapping per category.
pub type Assignments = PerCategory<IndexMap<String, String>>;

/// Serialized form of a [`TargetFilesConfig`].
///
/// Every section is optional when reading; missing or `null` sections fall
/// back to the built-in defaults or to empty mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFilesDocument {
    #[serde(default)]
    pub nlu_data_path: Option<String>,

    #[serde(default)]
    pub default_target_files: Option<PerCategory<Option<String>>>,

    #[serde(default)]
    pub target_files: Option<PerCategory<Option<IndexMap<String, String>>>>,
}

/// Target file assignments for every item category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFilesConfig {
    /// Directory holding the NLU data, relative to the working directory.
    nlu_data_path: String,

    /// Assignments per category.
    target_files: PerCategory<TargetFileMap>,

    /// Where the config is read from and written to.
    config_path: PathBuf,
}

impl TargetFilesConfig {
    /// Create a config from default files and explicit assignments.
    ///
    /// All paths are made relative to the working directory and every
    /// category is grouped by target file.
    pub fn new(
        nlu_data_path: impl AsRef<Path>,
        default_target_files: PerCategory<String>,
        assignments: Assignments,
    ) -> Result<Self> {
        let mut target_files = PerCategory::from_fn(|category| {
            TargetFileMap::new(default_target_files.get(category).clone())
        });
        for (category, entries) in assignments.iter() {
            let map = target_files.get_mut(category);
            *map = TargetFileMap::with_entries(
                map.default_file(),
                entries.iter().map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        Self::from_maps(nlu_data_path, target_files)
    }

    /// Create a config from prepared per-category maps.
    pub(crate) fn from_maps(
        nlu_data_path: impl AsRef<Path>,
        target_files: PerCategory<TargetFileMap>,
    ) -> Result<Self> {
        let mut config = Self {
            nlu_data_path: nlu_data_path.as_ref().to_string_lossy().into_owned(),
            target_files,
            config_path: PathBuf::from(TARGET_FILES_CONFIG_FILE),
        };
        config.ensure_relative_paths()?;
        config.sort();
        Ok(config)
    }

    /// Set the file the config is written to.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn nlu_data_path(&self) -> &str {
        &self.nlu_data_path
    }

    /// Assignments of one category.
    pub fn target_files(&self, category: ItemCategory) -> &TargetFileMap {
        self.target_files.get(category)
    }

    pub(crate) fn target_files_mut(&mut self, category: ItemCategory) -> &mut TargetFileMap {
        self.target_files.get_mut(category)
    }

    /// Default target file of every category.
    pub fn default_target_files(&self) -> PerCategory<String> {
        PerCategory::from_fn(|category| self.target_files(category).default_file().to_string())
    }

    /// Make every stored path relative to the working directory.
    fn ensure_relative_paths(&mut self) -> Result<()> {
        self.nlu_data_path = relative_to_cwd(&self.nlu_data_path)?;
        for category in ItemCategory::ALL {
            self.target_files_mut(category)
                .try_map_files(|file| relative_to_cwd(Path::new(file)))?;
        }
        Ok(())
    }

    /// Group the assignments of every category by target file.
    pub fn sort(&mut self) {
        for category in ItemCategory::ALL {
            self.target_files_mut(category).sort_by_target_file();
        }
    }

    /// Explicit assignments, category → item → target file.
    pub fn assignments(&self) -> Assignments {
        PerCategory::from_fn(|category| self.target_files(category).entries().clone())
    }

    /// Explicit assignments inverted to target file → category → items.
    ///
    /// Files appear in the order they are first used, scanning categories in
    /// document order.
    pub fn keys_per_file(&self) -> IndexMap<String, CategoryKeys> {
        let mut per_file: IndexMap<String, CategoryKeys> = IndexMap::new();
        for category in ItemCategory::ALL {
            for (key, file) in self.target_files(category).entries() {
                per_file
                    .entry(file.clone())
                    .or_default()
                    .get_mut(category)
                    .push(key.clone());
            }
        }
        per_file
    }

    /// Keys with an explicit assignment, per category.
    pub fn handled_keys(&self) -> PerCategory<HashSet<String>> {
        PerCategory::from_fn(|category| {
            self.target_files(category)
                .keys()
                .map(String::from)
                .collect()
        })
    }

    /// Assign `new_keys` to their category's default file explicitly.
    pub fn assign_to_defaults(&mut self, new_keys: &CategoryKeys) {
        for (category, keys) in new_keys.iter() {
            let map = self.target_files_mut(category);
            let default_file = map.default_file().to_string();
            for key in keys {
                if !map.contains(key) {
                    map.assign(key.clone(), default_file.as_str());
                }
            }
        }
        self.sort();
    }

    /// Serialized form of the config.
    pub fn to_document(&self) -> TargetFilesDocument {
        TargetFilesDocument {
            nlu_data_path: Some(self.nlu_data_path.clone()),
            default_target_files: Some(self.default_target_files().map(|_, file| Some(file))),
            target_files: Some(self.assignments().map(|_, entries| Some(entries))),
        }
    }

    /// Build a config from its serialized form, filling in defaults.
    pub fn from_document(document: TargetFilesDocument) -> Result<Self> {
        let defaults = document.default_target_files.unwrap_or_default();
        let default_target_files = defaults.map(|_, file| {
            file.unwrap_or_else(|| DEFAULT_NLU_TARGET_FILE.to_string())
        });
        let assignments = document
            .target_files
            .unwrap_or_default()
            .map(|_, entries| entries.unwrap_or_default());

        Self::new(
            document
                .nlu_data_path
                .unwrap_or_else(|| NLU_DATA_PATH.to_string()),
            default_target_files,
            assignments,
        )
    }

    /// Render the config as YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.to_document())?)
    }

    /// Parse a config from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let document: TargetFilesDocument = match serde_yaml::from_str(content) {
            Ok(document) => document,
            // An empty document has no sections at all.
            Err(_) if content.trim().is_empty() => TargetFilesDocument::default(),
            Err(e) => return Err(TargetFilesError::InvalidConfig(e.to_string())),
        };
        Self::from_document(document)
    }

    /// Load a config from a YAML file; it will be written back to the same
    /// file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| StorageError::ReadFile(format!("{}: {e}", path.display())))?;

        let config = Self::from_yaml_str(&content).map_err(|e| match e {
            TargetFilesError::InvalidConfig(msg) => {
                TargetFilesError::InvalidConfig(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        debug!("Loaded target files config from {}", path.display());
        Ok(config.with_config_path(path))
    }

    /// Write the config to its config path.
    pub fn write(&self) -> Result<()> {
        let path = &self.config_path;
        let content = self.to_yaml_string()?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .map_err(|e| StorageError::CreateDirectory(format!("{}: {e}", parent.display())))?;

        // Write atomically using a temp file
        let mut temp = NamedTempFile::new_in(parent)
            .map_err(|e| StorageError::WriteFile(format!("{}: {e}", path.display())))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| StorageError::WriteFile(format!("{}: {e}", path.display())))?;
        temp.persist(path)
            .map_err(|e| StorageError::WriteFile(format!("{}: {e}", path.display())))?;

        info!("Wrote target files config to {}", path.display());
        Ok(())
    }
}
