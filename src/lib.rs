//! dupfind - Concurrent Duplicate File Finder
//!
//! Walks a directory tree, hashes every regular file on a bounded pool of
//! worker threads and reports groups of files with identical content.
//!
//! The library is usable on its own through [`duplicates::DuplicateFinder`];
//! [`run_app`] is the glue the `dupfind` binary uses.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::{Config, Settings};
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::{ConfigError, ExitCode};
use crate::output::{write_header, write_report};
use crate::progress::Progress;
use crate::signal::CancellationToken;

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the scan fails or is
/// interrupted, or the report cannot be written. Classify it with
/// [`ExitCode::for_error`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    // A config file that --save-config is about to create need not exist yet
    let source = cli
        .config
        .as_deref()
        .filter(|path| !cli.save_config || path.is_file());
    let config = Config::load(source).context("Failed to load configuration")?;
    let settings = config.resolve(&cli)?;
    log::debug!("Effective settings: {:?}", settings);

    if cli.save_config {
        save_config(&config.with_overrides(&cli), cli.config.as_deref())?;
    }

    let cancel = signal::install_handler().context("Failed to install signal handler")?;
    run_scan(&settings, cancel)
}

/// Persist `config` to `explicit`, or to [`Config::default_path`].
fn save_config(config: &Config, explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::default_path().ok_or_else(|| {
            ConfigError::Invalid("no config directory on this platform".to_string())
        })?,
    };
    config.save(&path)?;
    log::info!("Configuration saved to {}", path.display());
    Ok(())
}

/// Scan `settings.path` and write the report.
///
/// The report destination is opened before the scan starts, so an
/// unwritable `--output-file` fails fast instead of after hashing.
///
/// # Errors
///
/// Same as [`run_app`], minus configuration loading. A destination that
/// cannot be created is a [`ConfigError::OutputFile`].
pub fn run_scan(settings: &Settings, cancel: CancellationToken) -> anyhow::Result<ExitCode> {
    let mut writer = open_output(settings.output_file.as_deref())?;

    if !settings.quiet {
        write_header(
            &mut io::stderr(),
            &settings.path,
            settings.algorithm,
            settings.workers,
        )?;
    }

    let mut finder_config = FinderConfig::default()
        .with_workers(settings.workers)
        .with_algorithm(settings.algorithm)
        .with_cancellation(cancel);
    if settings.show_progress {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let finder = DuplicateFinder::new(finder_config);
    let (groups, stats) = finder.find_duplicates(&settings.path)?;

    match &settings.output_file {
        Some(path) => {
            write_report(&mut writer, settings.format, &groups, &stats)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => {
            write_report(&mut writer, settings.format, &groups, &stats)
                .context("Failed to write report")?;
        }
    }

    Ok(ExitCode::Success)
}

/// Open the report destination: the given file, or stdout.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, ConfigError> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|source| ConfigError::OutputFile {
                path: path.to_path_buf(),
                source,
            })?;
            log::debug!("Writing report to {}", path.display());
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}
