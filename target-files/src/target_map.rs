//! Ordered item → target file assignments with a fallback file.

use std::collections::HashMap;

use indexmap::IndexMap;

/// Target file assignments for the items of one category.
///
/// Keys without an explicit entry resolve to the default file. Lookups never
/// insert: callers fall back to [`TargetFileMap::default_file`] explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFileMap {
    /// Fallback target for unassigned items.
    default_file: String,

    /// Explicit assignments, in significant order.
    entries: IndexMap<String, String>,
}

impl TargetFileMap {
    /// Create an empty map with the given default file.
    pub fn new(default_file: impl Into<String>) -> Self {
        Self {
            default_file: default_file.into(),
            entries: IndexMap::new(),
        }
    }

    /// Create a map from existing assignments, keeping their order.
    pub fn with_entries(
        default_file: impl Into<String>,
        entries: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            default_file: default_file.into(),
            entries: entries.into_iter().collect(),
        }
    }

    pub fn default_file(&self) -> &str {
        &self.default_file
    }

    /// The explicit target of `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The target of `key`, falling back to the default file.
    pub fn resolve(&self, key: &str) -> &str {
        self.get(key).unwrap_or(&self.default_file)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Assign `key` to `file`.
    ///
    /// A reassigned key moves to the end, so the most recent assignment also
    /// decides where the key sorts.
    pub fn assign(&mut self, key: impl Into<String>, file: impl Into<String>) {
        let key = key.into();
        self.entries.shift_remove(&key);
        self.entries.insert(key, file.into());
    }

    /// Assign every key in `keys` to `file`.
    pub fn assign_all<I, S>(&mut self, keys: I, file: &str)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.assign(key, file);
        }
    }

    /// Explicit assignments in order.
    pub fn entries(&self) -> &IndexMap<String, String> {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Group entries by target file.
    ///
    /// Groups appear in the order their file is first used; within a group
    /// the existing key order is kept.
    pub fn sort_by_target_file(&mut self) {
        let mut file_order: HashMap<String, usize> = HashMap::new();
        for file in self.entries.values() {
            let next = file_order.len();
            file_order.entry(file.clone()).or_insert(next);
        }

        self.entries.sort_by(|_, file_a, _, file_b| {
            file_order.get(file_a).cmp(&file_order.get(file_b))
        });
    }

    /// Rewrite the default file and every target with `f`.
    pub fn try_map_files<E>(
        &mut self,
        mut f: impl FnMut(&str) -> Result<String, E>,
    ) -> Result<(), E> {
        self.default_file = f(&self.default_file)?;
        for file in self.entries.values_mut() {
            *file = f(file)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries(map: &TargetFileMap) -> Vec<(&str, &str)> {
        map.entries()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_resolve_falls_back_without_inserting() {
        let map = TargetFileMap::with_entries(
            "data/nlu.yml",
            [("greet".to_string(), "data/x.yml".to_string())],
        );

        assert_eq!(map.resolve("greet"), "data/x.yml");
        assert_eq!(map.resolve("bye"), "data/nlu.yml");
        assert!(!map.contains("bye"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_sort_groups_by_first_seen_file() {
        let mut map = TargetFileMap::new("default.yml");
        map.assign("a", "one.yml");
        map.assign("b", "two.yml");
        map.assign("c", "one.yml");
        map.assign("d", "three.yml");
        map.assign("e", "two.yml");

        map.sort_by_target_file();

        assert_eq!(
            entries(&map),
            vec![
                ("a", "one.yml"),
                ("c", "one.yml"),
                ("b", "two.yml"),
                ("e", "two.yml"),
                ("d", "three.yml"),
            ]
        );
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut map = TargetFileMap::new("default.yml");
        for (key, file) in [("x", "b.yml"), ("y", "a.yml"), ("z", "b.yml")] {
            map.assign(key, file);
        }
        map.sort_by_target_file();
        let once = map.clone();
        map.sort_by_target_file();
        assert_eq!(map, once);
    }

    #[test]
    fn test_reassignment_moves_key_to_end() {
        let mut map = TargetFileMap::new("default.yml");
        map.assign_all(["greet", "bye"], "a.yml");
        map.assign_all(["greet"], "b.yml");
        map.sort_by_target_file();

        assert_eq!(entries(&map), vec![("bye", "a.yml"), ("greet", "b.yml")]);
    }

    #[test]
    fn test_try_map_files_rewrites_default_and_targets() {
        let mut map = TargetFileMap::with_entries(
            "./nlu.yml",
            [("greet".to_string(), "./a.yml".to_string())],
        );
        map.try_map_files(|file| Ok::<_, ()>(file.trim_start_matches("./").to_string()))
            .unwrap();

        assert_eq!(map.default_file(), "nlu.yml");
        assert_eq!(map.resolve("greet"), "a.yml");
    }
}
