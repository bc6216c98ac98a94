//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. built-in defaults
//! 2. `config.toml` in the platform config directory, or the file given
//!    with `--config`
//! 3. `DUPFIND_*` environment variables (e.g. `DUPFIND_WORKERS=8`)
//! 4. command-line flags
//!
//! ```toml
//! algorithm = "sha256"
//! workers = 8
//! format = "json"
//! show_progress = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::duplicates::default_workers;
use crate::error::ConfigError;
use crate::output::OutputFormat;
use crate::scanner::HashAlgorithm;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DUPFIND_";

/// Persistent configuration, as read from file and environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hash algorithm name.
    pub algorithm: String,
    /// Hashing workers; 0 means one per CPU.
    pub workers: usize,
    /// Report format name.
    pub format: String,
    /// Show the progress bar on interactive runs.
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default().name().to_string(),
            workers: 0,
            format: OutputFormat::default().name().to_string(),
            show_progress: true,
        }
    }
}

impl Config {
    /// Load defaults, the config file and the environment.
    ///
    /// Without `explicit`, a missing default config file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `explicit` does not exist or any
    /// layer cannot be parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::extract(Self::file_layers(explicit)?.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Defaults merged with the config file, without the environment layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `explicit` does not exist.
    pub fn file_layers(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Self::default()));

        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::Invalid(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                log::debug!("Loading config from {}", path.display());
                Ok(figment.merge(Toml::file(path)))
            }
            None => match Self::default_path() {
                Some(path) => {
                    log::debug!("Looking for config at {}", path.display());
                    Ok(figment.merge(Toml::file(path)))
                }
                None => Ok(figment),
            },
        }
    }

    /// Extract a config from assembled layers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a value has the wrong type.
    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Write this configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if serialization or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        fs::write(path, content).map_err(|e| {
            ConfigError::Invalid(format!("cannot write {}: {}", path.display(), e))
        })
    }

    /// Default platform-specific config file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupfind", "dupfind")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// This configuration with the persistent command-line overrides applied.
    ///
    /// Per-run flags (`--quiet`, `--output-file`) are not carried over.
    #[must_use]
    pub fn with_overrides(&self, cli: &Cli) -> Self {
        Self {
            algorithm: cli
                .algorithm
                .clone()
                .unwrap_or_else(|| self.algorithm.clone()),
            workers: cli.workers.unwrap_or(self.workers),
            format: cli
                .format
                .map_or_else(|| self.format.clone(), |f| f.name().to_string()),
            show_progress: self.show_progress && !cli.no_progress,
        }
    }

    /// Apply command-line overrides and validate names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedAlgorithm`] or
    /// [`ConfigError::UnsupportedFormat`] for unknown names.
    pub fn resolve(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let algorithm: HashAlgorithm = cli
            .algorithm
            .as_deref()
            .unwrap_or(&self.algorithm)
            .parse()?;

        let format = match cli.format {
            Some(format) => format,
            None => self.format.parse()?,
        };

        let workers = match cli.workers.unwrap_or(self.workers) {
            0 => default_workers(),
            n => n,
        };

        Ok(Settings {
            path: cli.path.clone(),
            algorithm,
            workers,
            format,
            output_file: cli.output_file.clone(),
            show_progress: self.show_progress && !cli.no_progress && !cli.quiet,
            quiet: cli.quiet,
        })
    }
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory to scan
    pub path: PathBuf,
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
    /// Hashing workers (at least 1)
    pub workers: usize,
    /// Report format
    pub format: OutputFormat,
    /// Report destination; stdout when `None`
    pub output_file: Option<PathBuf>,
    /// Draw the progress bar
    pub show_progress: bool,
    /// Suppress the banner and progress
    pub quiet: bool,
}
