//! Command-line interface definitions for dupfind.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory with the text report (default)
//! dupfind ~/Downloads
//!
//! # SHA-256 with 8 workers, JSON written to a file
//! dupfind ~/Photos -a sha256 -w 8 -f json -o dupes.json
//!
//! # Verbose mode for debugging
//! dupfind -vv ~/Downloads
//!
//! # Remember blake3 and 4 workers for later runs
//! dupfind ~/Downloads -a blake3 -w 4 --save-config
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Fast, concurrent duplicate file finder.
///
/// Hashes every regular file under PATH in parallel and reports groups of
/// files with identical content.
#[derive(Debug, Parser)]
#[command(name = "dupfind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Hash algorithm: md5, sha256 or blake3 (default: md5)
    #[arg(short, long = "algo", value_name = "ALGORITHM")]
    pub algorithm: Option<String>,

    /// Number of hashing workers (default: number of CPUs)
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Read configuration from FILE instead of the default location
    #[arg(long, value_name = "FILE", env = "DUPFIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store the effective algorithm, workers, format and progress setting
    /// in the config file before scanning
    #[arg(long)]
    pub save_config: bool,
}
