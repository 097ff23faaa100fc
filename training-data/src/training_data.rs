//! In-memory model of parsed NLU training data.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An entity annotation found inline in an example text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAnnotation {
    /// The annotated surface text.
    pub text: String,

    /// The entity type.
    pub entity: String,

    /// Value the text maps to, if it differs from the text.
    pub value: Option<String>,
}

impl EntityAnnotation {
    /// The synonym this annotation declares, as `(literal, value)`.
    pub fn synonym(&self) -> Option<(&str, &str)> {
        match &self.value {
            Some(value) if *value != self.text => Some((self.text.as_str(), value.as_str())),
            _ => None,
        }
    }
}

/// A single training example for an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Intent the example belongs to.
    pub intent: String,

    /// Example text, including any inline entity annotations.
    pub text: String,

    /// Entities annotated in the text.
    #[serde(default)]
    pub entities: Vec<EntityAnnotation>,

    /// Example-level metadata.
    #[serde(default)]
    pub metadata: Option<serde_yaml::Value>,
}

impl Message {
    /// Create an example without annotations or metadata.
    pub fn new(intent: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            text: text.into(),
            entities: Vec::new(),
            metadata: None,
        }
    }

    /// Attach metadata to the example.
    pub fn with_metadata(mut self, metadata: serde_yaml::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A named regular expression feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegexFeature {
    pub name: String,
    pub pattern: String,
}

impl RegexFeature {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// A named list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTable {
    pub name: String,
    pub elements: Vec<String>,
}

impl LookupTable {
    pub fn new(name: impl Into<String>, elements: Vec<String>) -> Self {
        Self {
            name: name.into(),
            elements,
        }
    }
}

/// The NLU items loaded from one or more data files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    /// Intent examples, in load order.
    pub training_examples: Vec<Message>,

    /// Entity synonyms, mapping literal text to its canonical value.
    pub entity_synonyms: IndexMap<String, String>,

    /// Regex features, in load order.
    pub regex_features: Vec<RegexFeature>,

    /// Lookup tables, in load order.
    pub lookup_tables: Vec<LookupTable>,

    /// Intent-level metadata, keyed by intent name.
    pub intent_metadata: IndexMap<String, serde_yaml::Value>,
}

impl TrainingData {
    /// Create empty training data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether there are no items at all.
    pub fn is_empty(&self) -> bool {
        self.training_examples.is_empty()
            && self.entity_synonyms.is_empty()
            && self.regex_features.is_empty()
            && self.lookup_tables.is_empty()
    }

    /// Add an example, recording any synonyms its annotations declare.
    pub fn add_example(&mut self, message: Message) {
        for entity in &message.entities {
            if let Some((literal, value)) = entity.synonym() {
                self.entity_synonyms
                    .insert(literal.to_string(), value.to_string());
            }
        }
        self.training_examples.push(message);
    }

    /// Merge `other` into `self`.
    ///
    /// Later synonym mappings for the same literal win, and lookup tables
    /// sharing a name are combined. Duplicates are dropped.
    pub fn merge(&mut self, other: TrainingData) {
        self.training_examples.extend(other.training_examples);
        self.entity_synonyms.extend(other.entity_synonyms);
        self.regex_features.extend(other.regex_features);
        self.lookup_tables.extend(other.lookup_tables);
        self.intent_metadata.extend(other.intent_metadata);
        self.deduplicate();
    }

    /// Drop duplicate examples, regexes and lookup elements, and combine
    /// lookup tables that share a name. First occurrences are kept.
    pub fn deduplicate(&mut self) {
        let mut seen_examples = HashSet::new();
        self.training_examples
            .retain(|ex| seen_examples.insert((ex.intent.clone(), ex.text.clone())));

        let mut seen_regexes = HashSet::new();
        self.regex_features
            .retain(|regex| seen_regexes.insert(regex.clone()));

        let mut tables: IndexMap<String, Vec<String>> = IndexMap::new();
        for table in self.lookup_tables.drain(..) {
            let elements = tables.entry(table.name).or_default();
            for element in table.elements {
                if !elements.contains(&element) {
                    elements.push(element);
                }
            }
        }
        self.lookup_tables = tables
            .into_iter()
            .map(|(name, elements)| LookupTable::new(name, elements))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_example_records_inline_synonyms() {
        let mut data = TrainingData::new();
        let mut message = Message::new("inform", "I live in [NYC](city:New York City)");
        message.entities.push(EntityAnnotation {
            text: "NYC".to_string(),
            entity: "city".to_string(),
            value: Some("New York City".to_string()),
        });
        data.add_example(message);

        assert_eq!(
            data.entity_synonyms.get("NYC").map(String::as_str),
            Some("New York City")
        );
    }

    #[test]
    fn test_annotation_with_identical_value_is_not_a_synonym() {
        let annotation = EntityAnnotation {
            text: "Berlin".to_string(),
            entity: "city".to_string(),
            value: Some("Berlin".to_string()),
        };
        assert_eq!(annotation.synonym(), None);
    }

    #[test]
    fn test_merge_drops_duplicates_and_combines_lookups() {
        let mut first = TrainingData::new();
        first.add_example(Message::new("greet", "hi"));
        first.regex_features.push(RegexFeature::new("zip", r"\d{5}"));
        first
            .lookup_tables
            .push(LookupTable::new("banks", vec!["ING".to_string()]));
        first
            .entity_synonyms
            .insert("nyc".to_string(), "New York".to_string());

        let mut second = TrainingData::new();
        second.add_example(Message::new("greet", "hi"));
        second.add_example(Message::new("greet", "hello"));
        second.regex_features.push(RegexFeature::new("zip", r"\d{5}"));
        second.lookup_tables.push(LookupTable::new(
            "banks",
            vec!["ING".to_string(), "ABN".to_string()],
        ));
        second
            .entity_synonyms
            .insert("nyc".to_string(), "New York City".to_string());

        first.merge(second);

        let texts: Vec<_> = first
            .training_examples
            .iter()
            .map(|ex| ex.text.as_str())
            .collect();
        assert_eq!(texts, vec!["hi", "hello"]);
        assert_eq!(first.regex_features.len(), 1);
        assert_eq!(
            first.lookup_tables,
            vec![LookupTable::new(
                "banks",
                vec!["ING".to_string(), "ABN".to_string()]
            )]
        );
        assert_eq!(first.entity_synonyms["nyc"], "New York City");
    }
}
