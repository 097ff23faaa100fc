//! Writer for the Rasa YAML NLU training data format.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::training_data::{Message, TrainingData};

/// Training data format version written to every file.
pub const TRAINING_DATA_FORMAT_VERSION: &str = "3.1";

#[derive(Serialize)]
struct NluDocument<'a> {
    version: &'a str,
    nlu: Vec<NluItem<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum NluItem<'a> {
    Intent {
        intent: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<&'a serde_yaml::Value>,
        examples: Examples<'a>,
    },
    Synonym {
        synonym: &'a str,
        examples: String,
    },
    Regex {
        regex: &'a str,
        examples: String,
    },
    Lookup {
        lookup: &'a str,
        examples: String,
    },
}

#[derive(Serialize)]
#[serde(untagged)]
enum Examples<'a> {
    Block(String),
    List(Vec<ExampleEntry<'a>>),
}

#[derive(Serialize)]
struct ExampleEntry<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a serde_yaml::Value>,
}

/// Render training data as Rasa YAML.
///
/// Intents come first in data order, followed by synonyms, regexes and
/// lookups grouped by name. An intent is written as a list of `text`
/// mappings when any of its examples has metadata or spans several lines.
pub fn to_nlu_yaml(data: &TrainingData) -> Result<String> {
    let mut items = Vec::new();

    let mut examples_per_intent: IndexMap<&str, Vec<&Message>> = IndexMap::new();
    for example in &data.training_examples {
        examples_per_intent
            .entry(example.intent.as_str())
            .or_default()
            .push(example);
    }
    for (intent, examples) in examples_per_intent {
        let examples = if examples.iter().any(|ex| needs_list_form(ex)) {
            Examples::List(
                examples
                    .iter()
                    .map(|ex| ExampleEntry {
                        text: ex.text.as_str(),
                        metadata: ex.metadata.as_ref(),
                    })
                    .collect(),
            )
        } else {
            Examples::Block(to_block(examples.iter().map(|ex| ex.text.as_str())))
        };
        items.push(NluItem::Intent {
            intent,
            metadata: data.intent_metadata.get(intent),
            examples,
        });
    }

    let mut literals_per_synonym: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for (literal, name) in &data.entity_synonyms {
        literals_per_synonym
            .entry(name.as_str())
            .or_default()
            .push(literal.as_str());
    }
    for (synonym, literals) in literals_per_synonym {
        items.push(NluItem::Synonym {
            synonym,
            examples: to_block(literals),
        });
    }

    let mut patterns_per_regex: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for regex in &data.regex_features {
        patterns_per_regex
            .entry(regex.name.as_str())
            .or_default()
            .push(regex.pattern.as_str());
    }
    for (regex, patterns) in patterns_per_regex {
        items.push(NluItem::Regex {
            regex,
            examples: to_block(patterns),
        });
    }

    for table in &data.lookup_tables {
        items.push(NluItem::Lookup {
            lookup: table.name.as_str(),
            examples: to_block(table.elements.iter().map(String::as_str)),
        });
    }

    let document = NluDocument {
        version: TRAINING_DATA_FORMAT_VERSION,
        nlu: items,
    };
    Ok(serde_yaml::to_string(&document)?)
}

/// A block holds one example per line, so multi-line texts and metadata
/// need the list of `text` mappings.
fn needs_list_form(example: &Message) -> bool {
    example.metadata.is_some() || example.text.contains('\n')
}

fn to_block<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    lines
        .into_iter()
        .map(|line| format!("- {line}\n"))
        .collect()
}
