//! NLU Target Files CLI
//!
//! Keeps NLU training data split across files the same way on every run.
//!
//! # Commands
//!
//! - `infer`: Bootstrap a target files config from the current data files
//! - `enforce`: Redistribute the data files according to the config

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use nlu_target_files::{
    DEFAULT_NLU_TARGET_FILE, NLU_DATA_PATH, TARGET_FILES_CONFIG_FILE, enforce_nlu_target_files,
    infer_nlu_target_files,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Assign NLU training data items to target files and keep them there
#[derive(Parser)]
#[command(name = "nlu-target-files", version, about)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer a target files config from the existing NLU data files.
    ///
    /// Every intent, synonym, regex and lookup table is assigned to the file
    /// it is found in; an item found in several files is assigned to the last
    /// one. NLU data files are not modified. Manually review the generated
    /// config before enforcing it!
    Infer {
        /// Path of the target files config to write
        #[arg(
            long = "target_files_config",
            visible_alias = "target-files-config",
            default_value = TARGET_FILES_CONFIG_FILE
        )]
        target_files_config: PathBuf,

        /// Directory containing the NLU training data
        #[arg(
            long = "nlu_data_path",
            visible_alias = "nlu-data-path",
            default_value = NLU_DATA_PATH
        )]
        nlu_data_path: PathBuf,

        /// File that items without an explicit target file are written to
        #[arg(
            long = "default_nlu_target_file",
            visible_alias = "default-nlu-target-file",
            default_value = DEFAULT_NLU_TARGET_FILE
        )]
        default_nlu_target_file: String,
    },

    /// Rewrite the NLU data files so every item lands in its target file.
    ///
    /// Files left without items are deleted. Items missing from the config
    /// are written to their category's default target file.
    Enforce {
        /// Path of the target files config to enforce
        #[arg(
            long = "target_files_config",
            visible_alias = "target-files-config",
            default_value = TARGET_FILES_CONFIG_FILE
        )]
        target_files_config: PathBuf,

        /// Add items missing from the config to it, assigned to their
        /// default target file
        #[arg(long = "update_config_file", visible_alias = "update-config-file")]
        update_config_file: bool,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Infer {
            target_files_config,
            nlu_data_path,
            default_nlu_target_file,
        } => {
            infer_nlu_target_files(
                &nlu_data_path,
                &target_files_config,
                &default_nlu_target_file,
            )
            .with_context(|| {
                format!(
                    "failed to infer target files from {}",
                    nlu_data_path.display()
                )
            })?;
            info!("Wrote {}", target_files_config.display());
        }
        Commands::Enforce {
            target_files_config,
            update_config_file,
        } => {
            let report = enforce_nlu_target_files(&target_files_config, update_config_file)
                .with_context(|| {
                    format!(
                        "failed to enforce target files from {}",
                        target_files_config.display()
                    )
                })?;
            info!(
                "Wrote {} files, deleted {}, {} items routed to default target files",
                report.written.len(),
                report.deleted.len(),
                report.new_keys.total()
            );
        }
    }

    Ok(())
}
