//! Relative path normalization.
//!
//! Every path stored in a target files config is relative to the working
//! directory, so a config written on one checkout applies to any other.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::Result;

/// Express `path` relative to the current working directory.
pub fn relative_to_cwd(path: impl AsRef<Path>) -> Result<String> {
    let cwd = env::current_dir()?;
    Ok(relative_to(path.as_ref(), &cwd))
}

/// Express `path` relative to `base`.
///
/// Both paths are normalized lexically first: `.` is dropped and `..`
/// removes the preceding component. Symlinks are not resolved.
pub fn relative_to(path: &Path, base: &Path) -> String {
    let base = normalize(base);
    let absolute = normalize(&base.join(path));

    let relative = pathdiff::diff_paths(&absolute, &base).unwrap_or(absolute);
    if relative.as_os_str().is_empty() {
        ".".to_string()
    } else {
        relative.to_string_lossy().into_owned()
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let ends_in_name = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if ends_in_name {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_relative_paths_are_normalized() {
        let base = Path::new("/home/bot/project");

        assert_eq!(relative_to(Path::new("data/nlu.yml"), base), "data/nlu.yml");
        assert_eq!(relative_to(Path::new("./data/../data/nlu.yml"), base), "data/nlu.yml");
        assert_eq!(
            relative_to(Path::new("/home/bot/project/data/nlu/a.yml"), base),
            "data/nlu/a.yml"
        );
        assert_eq!(relative_to(Path::new("/home/bot/other.yml"), base), "../other.yml");
        assert_eq!(relative_to(Path::new("."), base), ".");
    }

    #[test]
    fn test_relative_to_is_idempotent() {
        let base = Path::new("/srv/assistant");
        let once = relative_to(Path::new("/srv/shared/nlu.yml"), base);
        assert_eq!(relative_to(Path::new(&once), base), once);
    }

    #[test]
    fn test_relative_to_cwd_round_trips() {
        let cwd = env::current_dir().unwrap();
        let relative = relative_to_cwd(cwd.join("data").join("nlu.yml")).unwrap();
        assert_eq!(Path::new(&relative), Path::new("data").join("nlu.yml"));
    }
}
