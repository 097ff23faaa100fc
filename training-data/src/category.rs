//! The four kinds of NLU items that can be assigned to target files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A category of NLU training data items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Intents, keyed by intent name.
    Intents,

    /// Entity synonyms, keyed by canonical synonym value.
    Synonyms,

    /// Regex features, keyed by regex name.
    Regexes,

    /// Lookup tables, keyed by table name.
    Lookups,
}

impl ItemCategory {
    /// All categories, in document order.
    pub const ALL: [ItemCategory; 4] = [
        ItemCategory::Intents,
        ItemCategory::Synonyms,
        ItemCategory::Regexes,
        ItemCategory::Lookups,
    ];

    /// Name of the category as used in config documents.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemCategory::Intents => "intents",
            ItemCategory::Synonyms => "synonyms",
            ItemCategory::Regexes => "regexes",
            ItemCategory::Lookups => "lookups",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per item category.
///
/// Serializes as a mapping with the keys `intents`, `synonyms`, `regexes`
/// and `lookups`. Missing keys deserialize to `T::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct PerCategory<T> {
    pub intents: T,
    pub synonyms: T,
    pub regexes: T,
    pub lookups: T,
}

impl<T> PerCategory<T> {
    /// Build a value for every category from a function of the category.
    pub fn from_fn(mut f: impl FnMut(ItemCategory) -> T) -> Self {
        Self {
            intents: f(ItemCategory::Intents),
            synonyms: f(ItemCategory::Synonyms),
            regexes: f(ItemCategory::Regexes),
            lookups: f(ItemCategory::Lookups),
        }
    }

    pub fn get(&self, category: ItemCategory) -> &T {
        match category {
            ItemCategory::Intents => &self.intents,
            ItemCategory::Synonyms => &self.synonyms,
            ItemCategory::Regexes => &self.regexes,
            ItemCategory::Lookups => &self.lookups,
        }
    }

    pub fn get_mut(&mut self, category: ItemCategory) -> &mut T {
        match category {
            ItemCategory::Intents => &mut self.intents,
            ItemCategory::Synonyms => &mut self.synonyms,
            ItemCategory::Regexes => &mut self.regexes,
            ItemCategory::Lookups => &mut self.lookups,
        }
    }

    /// Transform every value, keeping the category structure.
    pub fn map<U>(self, mut f: impl FnMut(ItemCategory, T) -> U) -> PerCategory<U> {
        PerCategory {
            intents: f(ItemCategory::Intents, self.intents),
            synonyms: f(ItemCategory::Synonyms, self.synonyms),
            regexes: f(ItemCategory::Regexes, self.regexes),
            lookups: f(ItemCategory::Lookups, self.lookups),
        }
    }

    /// Iterate over `(category, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemCategory, &T)> {
        ItemCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}

impl<T: Clone> PerCategory<T> {
    /// The same value for every category.
    pub fn splat(value: T) -> Self {
        Self {
            intents: value.clone(),
            synonyms: value.clone(),
            regexes: value.clone(),
            lookups: value,
        }
    }
}

/// Item keys per category, e.g. the keys present in a snapshot or the keys
/// assigned to one target file.
pub type CategoryKeys = PerCategory<Vec<String>>;

impl CategoryKeys {
    /// Total number of keys across all categories.
    pub fn total(&self) -> usize {
        self.iter().map(|(_, keys)| keys.len()).sum()
    }
}
