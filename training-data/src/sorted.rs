//! Deterministic ordering and key-based projection of training data.
//!
//! Set-like items (synonyms, regexes, lookups) are ordered alphabetically.
//! Intents keep the order in which they first appear, and examples keep
//! their order within an intent, since that order is often deliberate.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;

use crate::category::{CategoryKeys, PerCategory};
use crate::error::Result;
use crate::reader::load_training_data;
use crate::training_data::{LookupTable, Message, TrainingData};

/// Training data in canonical order, with the item keys of every category.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedTrainingData {
    data: TrainingData,
    keys: CategoryKeys,
}

impl SortedTrainingData {
    /// Sort `data` into canonical order.
    pub fn new(mut data: TrainingData) -> Self {
        let synonyms = sort_synonyms(&mut data);
        let regexes = sort_regexes(&mut data);
        let lookups = sort_lookups(&mut data);
        let intents = sort_intent_examples(&mut data);

        Self {
            data,
            keys: CategoryKeys {
                intents,
                synonyms,
                regexes,
                lookups,
            },
        }
    }

    /// Load every NLU file under `path` and sort the result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(load_training_data(path)?))
    }

    /// The sorted data.
    pub fn data(&self) -> &TrainingData {
        &self.data
    }

    /// Item keys present per category: intents in first-seen order, all
    /// other categories sorted and distinct.
    pub fn keys(&self) -> &CategoryKeys {
        &self.keys
    }

    /// Project the data onto the allowed keys of each category.
    ///
    /// Intents are matched by name, synonyms by canonical value, regexes and
    /// lookups by name. Order is preserved.
    pub fn for_keys(&self, allowed: &CategoryKeys) -> TrainingData {
        let allowed: PerCategory<HashSet<&str>> = PerCategory::from_fn(|category| {
            allowed.get(category).iter().map(String::as_str).collect()
        });

        TrainingData {
            training_examples: self
                .data
                .training_examples
                .iter()
                .filter(|ex| allowed.intents.contains(ex.intent.as_str()))
                .cloned()
                .collect(),
            entity_synonyms: self
                .data
                .entity_synonyms
                .iter()
                .filter(|(_, name)| allowed.synonyms.contains(name.as_str()))
                .map(|(literal, name)| (literal.clone(), name.clone()))
                .collect(),
            regex_features: self
                .data
                .regex_features
                .iter()
                .filter(|regex| allowed.regexes.contains(regex.name.as_str()))
                .cloned()
                .collect(),
            lookup_tables: self
                .data
                .lookup_tables
                .iter()
                .filter(|table| allowed.lookups.contains(table.name.as_str()))
                .cloned()
                .collect(),
            intent_metadata: self
                .data
                .intent_metadata
                .iter()
                .filter(|(intent, _)| allowed.intents.contains(intent.as_str()))
                .map(|(intent, metadata)| (intent.clone(), metadata.clone()))
                .collect(),
        }
    }
}

/// Order synonyms by `(name, literal)` and return the distinct names.
fn sort_synonyms(data: &mut TrainingData) -> Vec<String> {
    data.entity_synonyms
        .sort_by(|lit_a, name_a, lit_b, name_b| (name_a, lit_a).cmp(&(name_b, lit_b)));

    let mut names: Vec<String> = data.entity_synonyms.values().cloned().collect();
    names.dedup();
    names
}

/// Order regexes by name (patterns keep their order) and return the
/// distinct names.
fn sort_regexes(data: &mut TrainingData) -> Vec<String> {
    data.regex_features.sort_by(|a, b| a.name.cmp(&b.name));

    let mut names: Vec<String> = data
        .regex_features
        .iter()
        .map(|regex| regex.name.clone())
        .collect();
    names.dedup();
    names
}

/// Sort every lookup table's elements and the tables by name, and return
/// the distinct names.
fn sort_lookups(data: &mut TrainingData) -> Vec<String> {
    let mut tables: IndexMap<String, Vec<String>> = IndexMap::new();
    for table in data.lookup_tables.drain(..) {
        tables.entry(table.name).or_default().extend(table.elements);
    }
    tables.sort_keys();

    data.lookup_tables = tables
        .into_iter()
        .map(|(name, mut elements)| {
            elements.sort();
            elements.dedup();
            LookupTable::new(name, elements)
        })
        .collect();

    data.lookup_tables
        .iter()
        .map(|table| table.name.clone())
        .collect()
}

/// Group examples by intent in first-seen intent order and return that
/// order.
fn sort_intent_examples(data: &mut TrainingData) -> Vec<String> {
    let mut per_intent: IndexMap<String, Vec<Message>> = IndexMap::new();
    for example in data.training_examples.drain(..) {
        per_intent
            .entry(example.intent.clone())
            .or_default()
            .push(example);
    }

    let intents: Vec<String> = per_intent.keys().cloned().collect();
    data.training_examples = per_intent.into_values().flatten().collect();
    intents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ItemCategory;
    use crate::training_data::RegexFeature;
    use pretty_assertions::assert_eq;

    fn unsorted() -> TrainingData {
        let mut data = TrainingData::new();
        data.add_example(Message::new("greet", "hi"));
        data.add_example(Message::new("bye", "see you"));
        data.add_example(Message::new("greet", "hello"));
        data.add_example(Message::new("affirm", "yes"));

        for (literal, name) in [
            ("piggy bank", "savings"),
            ("NYC", "New York"),
            ("pink pig", "savings"),
            ("big apple", "New York"),
        ] {
            data.entity_synonyms
                .insert(literal.to_string(), name.to_string());
        }

        data.regex_features.push(RegexFeature::new("zip", r"\d{5}"));
        data.regex_features.push(RegexFeature::new("account", r"\d{10}"));
        data.regex_features.push(RegexFeature::new("zip", r"\d{4}[A-Z]{2}"));

        data.lookup_tables.push(LookupTable::new(
            "cities",
            vec!["Rome".to_string(), "Berlin".to_string()],
        ));
        data.lookup_tables
            .push(LookupTable::new("banks", vec!["ING".to_string()]));
        data
    }

    #[test]
    fn test_intents_keep_first_seen_order() {
        let sorted = SortedTrainingData::new(unsorted());

        assert_eq!(sorted.keys().intents, vec!["greet", "bye", "affirm"]);
        let texts: Vec<_> = sorted
            .data()
            .training_examples
            .iter()
            .map(|ex| ex.text.as_str())
            .collect();
        assert_eq!(texts, vec!["hi", "hello", "see you", "yes"]);
    }

    #[test]
    fn test_set_like_items_sorted_alphabetically() {
        let sorted = SortedTrainingData::new(unsorted());
        let data = sorted.data();

        let synonyms: Vec<_> = data
            .entity_synonyms
            .iter()
            .map(|(literal, name)| (name.as_str(), literal.as_str()))
            .collect();
        assert_eq!(
            synonyms,
            vec![
                ("New York", "NYC"),
                ("New York", "big apple"),
                ("savings", "piggy bank"),
                ("savings", "pink pig"),
            ]
        );
        assert_eq!(sorted.keys().synonyms, vec!["New York", "savings"]);

        assert_eq!(sorted.keys().regexes, vec!["account", "zip"]);
        assert_eq!(
            data.regex_features
                .iter()
                .map(|r| r.pattern.as_str())
                .collect::<Vec<_>>(),
            vec![r"\d{10}", r"\d{5}", r"\d{4}[A-Z]{2}"]
        );

        assert_eq!(sorted.keys().lookups, vec!["banks", "cities"]);
        assert_eq!(
            data.lookup_tables[1].elements,
            vec!["Berlin".to_string(), "Rome".to_string()]
        );
    }

    #[test]
    fn test_for_keys_projects_each_category_independently() {
        let sorted = SortedTrainingData::new(unsorted());

        let mut allowed = sorted.keys().clone();
        allowed.get_mut(ItemCategory::Intents).retain(|i| i == "bye");

        let projected = sorted.for_keys(&allowed);
        assert_eq!(projected.training_examples.len(), 1);
        assert_eq!(projected.training_examples[0].intent, "bye");
        assert_eq!(projected.entity_synonyms, sorted.data().entity_synonyms);
        assert_eq!(projected.regex_features, sorted.data().regex_features);
        assert_eq!(projected.lookup_tables, sorted.data().lookup_tables);
    }

    #[test]
    fn test_for_keys_with_nothing_allowed_is_empty() {
        let sorted = SortedTrainingData::new(unsorted());
        assert!(sorted.for_keys(&CategoryKeys::default()).is_empty());
    }
}
