//! # NLU Target Files
//!
//! This crate maps NLU training data items to the files they are stored in,
//! so training data can be split across files deterministically:
//!
//! - **Config**: Per-category item → target file assignments with a default
//!   file per category, persisted as YAML
//! - **Inference**: Bootstrap a config from the current layout of the data
//!   ("last file wins")
//! - **Enforcement**: Rewrite the data files so every item lands in its
//!   target file, deleting files left empty
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      NLU Target Files                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  infer_from_files ──► TargetFilesConfig ──► nlu_target_files.yml │
//! │                              │                                  │
//! │                              ▼                                  │
//! │  SortedTrainingData ──► EnforcementPlan ──► data files          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod enforce;
pub mod error;
mod infer;
pub mod operations;
pub mod paths;
pub mod target_map;

pub use config::{
    Assignments, DEFAULT_NLU_TARGET_FILE, NLU_DATA_PATH, TARGET_FILES_CONFIG_FILE,
    TargetFilesConfig, TargetFilesDocument,
};
pub use enforce::{EnforcementPlan, EnforcementReport, FileWrite};
pub use error::{Result, StorageError, TargetFilesError};
pub use operations::{enforce_nlu_target_files, infer_nlu_target_files};
pub use paths::{relative_to, relative_to_cwd};
pub use target_map::TargetFileMap;

pub use nlu_training_data::{CategoryKeys, ItemCategory, PerCategory};
