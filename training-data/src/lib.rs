//! # NLU Training Data
//!
//! This crate reads, orders, filters and writes Rasa YAML NLU training data.
//! It provides:
//!
//! - **File Discovery**: Find NLU files in a data directory
//! - **Reader**: Parse intents, synonyms (explicit and inline), regexes and
//!   lookup tables into [`TrainingData`]
//! - **Sorted View**: Canonical, reviewable ordering and per-category item
//!   keys via [`SortedTrainingData`]
//! - **Writer**: Render a snapshot as the contents of a single YAML file
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      NLU Training Data                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  nlu_files_in ──► read_nlu_file ──► TrainingData                │
//! │                                          │                      │
//! │                                          ▼                      │
//! │  to_nlu_yaml ◄── for_keys ◄── SortedTrainingData                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod error;
pub mod files;
pub mod reader;
pub mod sorted;
pub mod training_data;
pub mod writer;

pub use category::{CategoryKeys, ItemCategory, PerCategory};
pub use error::{DataError, Result};
pub use files::{is_nlu_file, nlu_files_in};
pub use reader::{load_training_data, parse_nlu_yaml, read_nlu_file};
pub use sorted::SortedTrainingData;
pub use training_data::{EntityAnnotation, LookupTable, Message, RegexFeature, TrainingData};
pub use writer::to_nlu_yaml;
