//! Reader for the Rasa YAML NLU training data format.
//!
//! ```yaml
//! nlu:
//! - intent: inform
//!   examples: |
//!     - I live in [NYC](city:New York City)
//! - synonym: New York City
//!   examples: |
//!     - big apple
//! - regex: zipcode
//!   examples: |
//!     - \d{5}
//! - lookup: cities
//!   examples: |
//!     - Berlin
//! ```
//!
//! Intents are identified by their examples. An intent with no examples is
//! logged and contributes no item, so its intent-level `metadata` is not
//! carried into rewritten files.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex_lite::{Captures, Regex};
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::error::{DataError, Result};
use crate::files::nlu_files_in;
use crate::training_data::{EntityAnnotation, LookupTable, Message, RegexFeature, TrainingData};

const KEY_NLU: &str = "nlu";
const KEY_INTENT: &str = "intent";
const KEY_SYNONYM: &str = "synonym";
const KEY_REGEX: &str = "regex";
const KEY_LOOKUP: &str = "lookup";
const KEY_EXAMPLES: &str = "examples";
const KEY_METADATA: &str = "metadata";
const KEY_TEXT: &str = "text";

/// `[text](entity)`, `[text](entity:value)`, `[text]{"entity": ..}` and
/// `[text][{"entity": ..}, ..]`.
#[allow(clippy::expect_used)]
static ENTITY_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[(?P<text>[^\]]+?)\](?:\((?P<entity>[^:)]+?)(?::(?P<value>[^)]+))?\)|\{(?P<dict>[^}]+?)\}|\[(?P<list>.*?)\])",
    )
    .expect("entity annotation pattern is valid")
});

/// Load and merge every NLU file under `path` (a file or a directory).
pub fn load_training_data(path: impl AsRef<Path>) -> Result<TrainingData> {
    let mut data = TrainingData::new();
    for file in nlu_files_in(path)? {
        data.merge(read_nlu_file(&file)?);
    }
    Ok(data)
}

/// Read a single NLU file.
pub fn read_nlu_file(path: impl AsRef<Path>) -> Result<TrainingData> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| DataError::ReadFile(format!("{}: {e}", path.display())))?;

    let data = parse_nlu_yaml(&content, &path.display().to_string())?;
    debug!(
        "Read {} examples from {}",
        data.training_examples.len(),
        path.display()
    );
    Ok(data)
}

/// Parse NLU training data from YAML text. `source` names the input in
/// error messages.
pub fn parse_nlu_yaml(content: &str, source: &str) -> Result<TrainingData> {
    let document: Value = serde_yaml::from_str(content)
        .map_err(|e| DataError::InvalidFormat(format!("{source}: {e}")))?;

    let mut data = TrainingData::new();

    let root = match document {
        Value::Null => return Ok(data),
        Value::Mapping(root) => root,
        _ => {
            return Err(DataError::InvalidFormat(format!(
                "{source}: top level must be a mapping"
            )));
        }
    };

    let items = match root.get(KEY_NLU) {
        None | Some(Value::Null) => return Ok(data),
        Some(Value::Sequence(items)) => items,
        Some(_) => {
            return Err(DataError::InvalidFormat(format!(
                "{source}: `{KEY_NLU}` must be a list"
            )));
        }
    };

    for item in items {
        let Value::Mapping(item) = item else {
            return Err(DataError::InvalidFormat(format!(
                "{source}: every `{KEY_NLU}` entry must be a mapping"
            )));
        };
        parse_item(item, source, &mut data)?;
    }

    data.deduplicate();
    Ok(data)
}

fn parse_item(item: &Mapping, source: &str, data: &mut TrainingData) -> Result<()> {
    if let Some(name) = item.get(KEY_INTENT) {
        let intent = item_name(name, KEY_INTENT, source)?;
        if let Some(metadata) = item.get(KEY_METADATA) {
            data.intent_metadata.insert(intent.clone(), metadata.clone());
        }
        let messages = intent_examples(item, &intent, source)?;
        if messages.is_empty() {
            warn!(
                "{source}: intent `{intent}` has no examples and will be dropped when rewritten"
            );
        }
        for message in messages {
            data.add_example(message);
        }
    } else if let Some(name) = item.get(KEY_SYNONYM) {
        let synonym = item_name(name, KEY_SYNONYM, source)?;
        for literal in block_examples(item, &synonym, source)? {
            data.entity_synonyms.insert(literal, synonym.clone());
        }
    } else if let Some(name) = item.get(KEY_REGEX) {
        let regex = item_name(name, KEY_REGEX, source)?;
        for pattern in block_examples(item, &regex, source)? {
            data.regex_features.push(RegexFeature::new(regex.clone(), pattern));
        }
    } else if let Some(name) = item.get(KEY_LOOKUP) {
        let lookup = item_name(name, KEY_LOOKUP, source)?;
        let elements = block_examples(item, &lookup, source)?;
        data.lookup_tables.push(LookupTable::new(lookup, elements));
    } else {
        let keys: Vec<String> = item.keys().filter_map(scalar_to_string).collect();
        warn!(
            "{source}: skipping unsupported NLU item with keys [{}]",
            keys.join(", ")
        );
    }
    Ok(())
}

fn item_name(value: &Value, kind: &str, source: &str) -> Result<String> {
    scalar_to_string(value)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DataError::InvalidFormat(format!("{source}: `{kind}` must name the item")))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn examples_value<'a>(item: &'a Mapping, name: &str, source: &str) -> Result<&'a Value> {
    item.get(KEY_EXAMPLES).ok_or_else(|| {
        DataError::InvalidFormat(format!("{source}: `{name}` has no `{KEY_EXAMPLES}`"))
    })
}

/// Examples of a synonym, regex or lookup section: always a block string.
fn block_examples(item: &Mapping, name: &str, source: &str) -> Result<Vec<String>> {
    match examples_value(item, name, source)? {
        Value::String(block) => Ok(split_block(block)),
        Value::Null => Ok(Vec::new()),
        _ => Err(DataError::InvalidFormat(format!(
            "{source}: `{KEY_EXAMPLES}` of `{name}` must be a block of `- ` lines"
        ))),
    }
}

/// Examples of an intent: a block string, or a list of `text`/`metadata`
/// mappings.
fn intent_examples(item: &Mapping, intent: &str, source: &str) -> Result<Vec<Message>> {
    match examples_value(item, intent, source)? {
        Value::String(block) => Ok(split_block(block)
            .into_iter()
            .map(|text| annotated_message(intent, text, source))
            .collect()),
        Value::Null => Ok(Vec::new()),
        Value::Sequence(entries) => {
            let mut messages = Vec::with_capacity(entries.len());
            for entry in entries {
                let (text, metadata) = match entry {
                    Value::Mapping(entry) => {
                        let text = entry.get(KEY_TEXT).and_then(scalar_to_string).ok_or_else(
                            || {
                                DataError::InvalidFormat(format!(
                                    "{source}: example of `{intent}` has no `{KEY_TEXT}`"
                                ))
                            },
                        )?;
                        (text, entry.get(KEY_METADATA).cloned())
                    }
                    other => match scalar_to_string(other) {
                        Some(text) => (text, None),
                        None => {
                            return Err(DataError::InvalidFormat(format!(
                                "{source}: unsupported example of `{intent}`"
                            )));
                        }
                    },
                };
                let mut message = annotated_message(intent, text.trim().to_string(), source);
                message.metadata = metadata;
                messages.push(message);
            }
            Ok(messages)
        }
        _ => Err(DataError::InvalidFormat(format!(
            "{source}: `{KEY_EXAMPLES}` of `{intent}` must be a block or a list"
        ))),
    }
}

/// Split a `- item` block into its items.
fn split_block(block: &str) -> Vec<String> {
    block
        .lines()
        .map(|line| strip_list_marker(line.trim()))
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    line.strip_prefix('-').map_or(line, str::trim_start)
}

fn annotated_message(intent: &str, text: String, source: &str) -> Message {
    let entities = parse_entity_annotations(&text, source);
    let mut message = Message::new(intent, text);
    message.entities = entities;
    message
}

/// Extract the inline entity annotations of an example text.
pub fn parse_entity_annotations(text: &str, source: &str) -> Vec<EntityAnnotation> {
    let mut entities = Vec::new();
    for captures in ENTITY_ANNOTATION.captures_iter(text) {
        let Some(entity_text) = captures.name("text").map(|m| m.as_str().to_string()) else {
            continue;
        };
        if let Some(entity) = captures.name("entity") {
            entities.push(EntityAnnotation {
                text: entity_text,
                entity: entity.as_str().trim().to_string(),
                value: captures.name("value").map(|m| m.as_str().trim().to_string()),
            });
        } else {
            entities.extend(json_annotations(&captures, &entity_text, text, source));
        }
    }
    entities
}

fn json_annotations(
    captures: &Captures<'_>,
    entity_text: &str,
    text: &str,
    source: &str,
) -> Vec<EntityAnnotation> {
    let parsed = if let Some(dict) = captures.name("dict") {
        serde_json::from_str::<serde_json::Value>(&format!("{{{}}}", dict.as_str()))
            .map(|value| vec![value])
    } else if let Some(list) = captures.name("list") {
        serde_json::from_str::<Vec<serde_json::Value>>(&format!("[{}]", list.as_str()))
    } else {
        return Vec::new();
    };

    match parsed {
        Ok(values) => values
            .iter()
            .filter_map(|value| {
                let entity = value.get("entity")?.as_str()?.to_string();
                let value = value.get("value").and_then(json_scalar_to_string);
                Some(EntityAnnotation {
                    text: entity_text.to_string(),
                    entity,
                    value,
                })
            })
            .collect(),
        Err(e) => {
            warn!("{source}: ignoring malformed entity annotation in \"{text}\": {e}");
            Vec::new()
        }
    }
}

fn json_scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
