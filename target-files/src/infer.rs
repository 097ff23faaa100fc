//! Inferring a target files config from the current layout of the data.

use std::path::Path;

use nlu_training_data::{ItemCategory, PerCategory, SortedTrainingData, nlu_files_in};
use tracing::debug;

use crate::config::TargetFilesConfig;
use crate::error::Result;
use crate::target_map::TargetFileMap;

impl TargetFilesConfig {
    /// Assign every item found under `nlu_data_path` to the file it is in.
    ///
    /// Files are scanned in listing order and an item found in several files
    /// is assigned to the last one. Synonyms count as present in a file if
    /// any literal maps to them there, including inline annotations.
    pub fn infer_from_files(
        nlu_data_path: impl AsRef<Path>,
        default_target_files: PerCategory<String>,
    ) -> Result<Self> {
        let nlu_data_path = nlu_data_path.as_ref();
        let mut target_files = default_target_files.map(|_, file| TargetFileMap::new(file));

        for file in nlu_files_in(nlu_data_path)? {
            let data = SortedTrainingData::load(&file)?;
            let file_name = file.to_string_lossy();

            for category in ItemCategory::ALL {
                let keys = data.keys().get(category);
                debug!("{}: found {} {category}", file.display(), keys.len());
                target_files
                    .get_mut(category)
                    .assign_all(keys.iter().cloned(), &file_name);
            }
        }

        Self::from_maps(nlu_data_path, target_files)
    }
}
