//! Redistributing NLU data into its target files.
//!
//! Enforcement is split into a pure planning step, which decides what every
//! file should contain, and an apply step that touches the disk. Applying
//! renders and stages all contents before any file is replaced, so a failure
//! while rendering leaves the data untouched.

use std::fs;
use std::io::Write;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use nlu_training_data::{CategoryKeys, ItemCategory, SortedTrainingData, nlu_files_in, to_nlu_yaml};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::TargetFilesConfig;
use crate::error::{Result, StorageError};
use crate::paths::relative_to_cwd;

/// Contents to write to one target file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileWrite {
    /// Target file, relative to the working directory.
    pub path: String,

    /// Items that belong in the file.
    pub keys: CategoryKeys,
}

/// What enforcement will do to the data files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnforcementPlan {
    /// Files to (re)write, in processing order.
    pub writes: Vec<FileWrite>,

    /// Existing files that end up without items.
    pub deletions: Vec<String>,

    /// Items present in the data without an explicit target.
    pub new_keys: CategoryKeys,
}

/// Outcome of an enforcement run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnforcementReport {
    /// Files written.
    pub written: Vec<String>,

    /// Files deleted.
    pub deleted: Vec<String>,

    /// Items that were routed to their category's default file.
    pub new_keys: CategoryKeys,
}

impl TargetFilesConfig {
    /// Keys present in the data without an explicit assignment, in data
    /// order.
    pub fn new_keys(&self, present: &CategoryKeys) -> CategoryKeys {
        CategoryKeys::from_fn(|category| {
            let target_files = self.target_files(category);
            present
                .get(category)
                .iter()
                .filter(|key| !target_files.contains(key))
                .cloned()
                .collect()
        })
    }

    /// Plan the contents of every data file.
    ///
    /// `present` are the keys found in the data, `existing_files` the NLU
    /// files currently on disk (relative to the working directory). Every
    /// existing file and every file with assigned items is considered:
    /// existing files with no items are deleted, all others are written.
    pub fn plan_enforcement(
        &self,
        present: &CategoryKeys,
        existing_files: &[String],
    ) -> EnforcementPlan {
        let new_keys = self.new_keys(present);

        let mut keys_per_file = self.keys_per_file();
        for category in ItemCategory::ALL {
            let keys = new_keys.get(category);
            if keys.is_empty() {
                continue;
            }
            let default_file = self.target_files(category).default_file();
            keys_per_file
                .entry(default_file.to_string())
                .or_default()
                .get_mut(category)
                .extend(keys.iter().cloned());
        }

        let existing: IndexSet<&str> = existing_files.iter().map(String::as_str).collect();
        let files: IndexSet<&str> = existing
            .iter()
            .copied()
            .chain(keys_per_file.keys().map(String::as_str))
            .collect();

        let mut plan = EnforcementPlan {
            new_keys,
            ..Default::default()
        };
        for file in files {
            match keys_per_file.get(file) {
                Some(keys) if keys.total() > 0 => plan.writes.push(FileWrite {
                    path: file.to_string(),
                    keys: keys.clone(),
                }),
                _ if existing.contains(file) => plan.deletions.push(file.to_string()),
                _ => {}
            }
        }
        plan
    }

    /// Redistribute the data under the config's data path into the target
    /// files.
    ///
    /// With `update_config_file`, items without a target are assigned their
    /// category's default file and the config is written back.
    pub fn enforce_on_files(&mut self, update_config_file: bool) -> Result<EnforcementReport> {
        let data = SortedTrainingData::load(self.nlu_data_path())?;

        let existing_files = nlu_files_in(self.nlu_data_path())?
            .iter()
            .map(relative_to_cwd)
            .collect::<Result<Vec<_>>>()?;

        let plan = self.plan_enforcement(data.keys(), &existing_files);
        let report = plan.apply(&data)?;

        if update_config_file {
            self.assign_to_defaults(&plan.new_keys);
            self.write()?;
        }

        Ok(report)
    }
}

impl EnforcementPlan {
    /// Write and delete files as planned.
    pub fn apply(&self, data: &SortedTrainingData) -> Result<EnforcementReport> {
        // Render everything before touching the disk.
        let mut rendered: IndexMap<&str, String> = IndexMap::new();
        for write in &self.writes {
            rendered.insert(write.path.as_str(), to_nlu_yaml(&data.for_keys(&write.keys))?);
        }

        let mut staged = Vec::with_capacity(rendered.len());
        for (path, content) in rendered {
            staged.push((path, stage(Path::new(path), &content)?));
        }

        let mut report = EnforcementReport {
            new_keys: self.new_keys.clone(),
            ..Default::default()
        };

        for (path, temp) in staged {
            info!("Writing data to file {path}");
            temp.persist(path)
                .map_err(|e| StorageError::WriteFile(format!("{path}: {e}")))?;
            report.written.push(path.to_string());
        }

        for path in &self.deletions {
            warn!("No data found for file {path}; deleting {path}");
            fs::remove_file(path)
                .map_err(|e| StorageError::DeleteFile(format!("{path}: {e}")))?;
            report.deleted.push(path.clone());
        }

        debug!(
            "Enforcement wrote {} files and deleted {}",
            report.written.len(),
            report.deleted.len()
        );
        Ok(report)
    }
}

/// Write `content` to a temporary file next to `path`.
fn stage(path: &Path, content: &str) -> Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .map_err(|e| StorageError::CreateDirectory(format!("{}: {e}", parent.display())))?;

    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| StorageError::WriteFile(format!("{}: {e}", path.display())))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| StorageError::WriteFile(format!("{}: {e}", path.display())))?;
    Ok(temp)
}
