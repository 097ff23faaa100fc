//! The `infer` and `enforce` operations.

use std::path::Path;

use nlu_training_data::PerCategory;
use tracing::{error, warn};

use crate::config::TargetFilesConfig;
use crate::enforce::EnforcementReport;
use crate::error::{Result, TargetFilesError};

/// Bootstrap a target files config from the files in `nlu_data_path` and
/// write it to `target_files_config`. NLU data files are not modified.
pub fn infer_nlu_target_files(
    nlu_data_path: impl AsRef<Path>,
    target_files_config: impl AsRef<Path>,
    default_nlu_target_file: &str,
) -> Result<TargetFilesConfig> {
    let nlu_data_path = nlu_data_path.as_ref();
    let target_files_config = target_files_config.as_ref();

    if !nlu_data_path.is_dir() {
        error!("Directory {} does not exist", nlu_data_path.display());
        return Err(TargetFilesError::DirectoryNotFound(
            nlu_data_path.display().to_string(),
        ));
    }

    log_inference_warning(nlu_data_path, target_files_config);

    let config = TargetFilesConfig::infer_from_files(
        nlu_data_path,
        PerCategory::splat(default_nlu_target_file.to_string()),
    )?
    .with_config_path(target_files_config);
    config.write()?;
    Ok(config)
}

/// Redistribute NLU data into the target files named by the config at
/// `target_files_config`.
pub fn enforce_nlu_target_files(
    target_files_config: impl AsRef<Path>,
    update_config_file: bool,
) -> Result<EnforcementReport> {
    let target_files_config = target_files_config.as_ref();
    let mut config = TargetFilesConfig::load(target_files_config)?;

    log_enforcement_info(target_files_config, config.nlu_data_path());
    config.enforce_on_files(update_config_file)
}

fn log_inference_warning(nlu_data_path: &Path, target_files_config: &Path) {
    warn!(
        "\n\
        Bootstrapping NLU target files config based on files in {}.\n\n\
        N.B. Manually review the output in {} before enforcing it!\n\n\
        If an intent/synonym/etc. is found in multiple files, the last file it appears in \
        will be taken as the target file.\n\
        Synonyms in the short (inline) and long formats have equal status in loaded \
        training data, so a file can be found to contain a synonym even when it has no \
        explicit \"synonym:\" section.\n",
        nlu_data_path.display(),
        target_files_config.display()
    );
}

fn log_enforcement_info(target_files_config: &Path, nlu_data_path: &str) {
    warn!(
        "Redistributing data in directory {nlu_data_path} into target files according to \
        config in {}",
        target_files_config.display()
    );
    warn!(
        "Note that synonyms, regexes & lookups will be sorted alphabetically. \
        Therefore you may see a large diff the first time you run this command."
    );
}
