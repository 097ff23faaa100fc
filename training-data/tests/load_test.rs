//! Integration tests for loading a data directory into a sorted snapshot.

use std::fs;
use std::path::Path;

use nlu_training_data::{DataError, ItemCategory, SortedTrainingData, to_nlu_yaml};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn data_dir() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(
        &root.join("a.yml"),
        r#"version: "3.1"
nlu:
- intent: greet
  examples: |
    - hi
- intent: bye
  examples: |
    - see you
- lookup: cities
  examples: |
    - Rome
"#,
    );
    write(
        &root.join("b.yml"),
        r#"nlu:
- intent: greet
  examples: |
    - hi
    - hello
- intent: inform
  examples: |
    - I live in [NYC](city:New York City)
- synonym: savings
  examples: |
    - piggy bank
- lookup: cities
  examples: |
    - Berlin
    - Rome
"#,
    );
    write(&root.join("domain.yml"), "intents:\n- greet\n");
    temp_dir
}

#[test]
fn test_directory_loads_merged_and_sorted() {
    let temp_dir = data_dir();
    let sorted = SortedTrainingData::load(temp_dir.path()).unwrap();

    assert_eq!(sorted.keys().intents, vec!["greet", "bye", "inform"]);
    assert_eq!(sorted.keys().synonyms, vec!["New York City", "savings"]);
    assert_eq!(sorted.keys().lookups, vec!["cities"]);

    let greet: Vec<_> = sorted
        .data()
        .training_examples
        .iter()
        .filter(|ex| ex.intent == "greet")
        .map(|ex| ex.text.as_str())
        .collect();
    assert_eq!(greet, vec!["hi", "hello"]);

    assert_eq!(
        sorted.data().lookup_tables[0].elements,
        vec!["Berlin".to_string(), "Rome".to_string()]
    );
}

#[test]
fn test_inline_synonym_counts_as_present_in_file() {
    let temp_dir = data_dir();
    let sorted = SortedTrainingData::load(temp_dir.path().join("b.yml")).unwrap();

    assert!(
        sorted
            .keys()
            .get(ItemCategory::Synonyms)
            .contains(&"New York City".to_string())
    );
}

#[test]
fn test_rewriting_sorted_projection_is_stable() {
    let temp_dir = data_dir();
    let sorted = SortedTrainingData::load(temp_dir.path()).unwrap();

    let out = temp_dir.path().join("out/all.yml");
    write(&out, &to_nlu_yaml(&sorted.for_keys(sorted.keys())).unwrap());

    let reloaded = SortedTrainingData::load(&out).unwrap();
    assert_eq!(reloaded.keys(), sorted.keys());
    assert_eq!(reloaded.data(), sorted.data());
}

#[test]
fn test_malformed_file_aborts_load() {
    let temp_dir = data_dir();
    write(&temp_dir.path().join("c.yml"), "nlu:\n- intent: [broken\n");

    let result = SortedTrainingData::load(temp_dir.path());
    assert!(matches!(result, Err(DataError::InvalidFormat(_))));
}
