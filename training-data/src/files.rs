//! Discovery of NLU data files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{DataError, Result};

/// File extensions the YAML training data format uses.
const YAML_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Top-level key that marks a YAML file as NLU training data.
const NLU_KEY: &str = "nlu:";

/// Whether the path has a YAML extension.
fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| YAML_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Check whether a file holds NLU training data.
///
/// The check is textual (a YAML file with a top-level `nlu:` key) so that a
/// malformed data file is still picked up and reported by the reader.
pub fn is_nlu_file(path: &Path) -> Result<bool> {
    if !path.is_file() || !is_yaml_path(path) {
        return Ok(false);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| DataError::ReadFile(format!("{}: {e}", path.display())))?;

    Ok(content.lines().any(|line| line.starts_with(NLU_KEY)))
}

/// List the NLU files under `path`.
///
/// `path` may be a single file or a directory. Directories are walked
/// recursively in file name order, skipping hidden files and directories.
/// A path that does not exist yields no files.
pub fn nlu_files_in(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = path.as_ref();

    if !root.exists() {
        debug!("No NLU data at {}", root.display());
        return Ok(Vec::new());
    }

    if root.is_file() {
        return Ok(if is_nlu_file(root)? {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut files = Vec::new();
    for entry in walker {
        let entry =
            entry.map_err(|e| DataError::ReadFile(format!("{}: {e}", root.display())))?;

        // Skip directories (only files hold data)
        if entry.file_type().is_dir() {
            continue;
        }

        if is_nlu_file(entry.path())? {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} NLU files in {}", files.len(), root.display());
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = File::create(path).unwrap();
        write!(file, "{content}").unwrap();
    }

    #[test]
    fn test_lists_only_nlu_yaml_files_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(&root.join("b.yml"), "nlu:\n- intent: greet\n  examples: |\n    - hi\n");
        write(&root.join("a.yaml"), "version: \"3.1\"\nnlu: []\n");
        write(&root.join("domain.yml"), "intents:\n- greet\n");
        write(&root.join("notes.txt"), "nlu: not yaml\n");
        write(&root.join("sub/c.yml"), "nlu: []\n");

        let files = nlu_files_in(root).unwrap();
        assert_eq!(
            files,
            vec![root.join("a.yaml"), root.join("b.yml"), root.join("sub/c.yml")]
        );
    }

    #[test]
    fn test_skips_hidden_entries() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(&root.join(".hidden.yml"), "nlu: []\n");
        write(&root.join(".cache/data.yml"), "nlu: []\n");
        write(&root.join("visible.yml"), "nlu: []\n");

        let files = nlu_files_in(root).unwrap();
        assert_eq!(files, vec![root.join("visible.yml")]);
    }

    #[test]
    fn test_single_file_and_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("nlu.yml");
        write(&file, "nlu: []\n");

        assert_eq!(nlu_files_in(&file).unwrap(), vec![file.clone()]);
        assert!(nlu_files_in(temp_dir.path().join("missing")).unwrap().is_empty());
    }
}
