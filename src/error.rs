//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the dupfind binary.
///
/// - 0: Success (scan completed, whether or not duplicates were found)
/// - 1: General error (unexpected failure)
/// - 2: Configuration error (bad path, unknown algorithm, bad config file)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Configuration error: the scan could not be set up.
    ConfigError = 2,
    /// Interrupted: Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DF000",
            Self::GeneralError => "DF001",
            Self::ConfigError => "DF002",
            Self::Interrupted => "DF130",
        }
    }

    /// Classify an application error for the process exit status.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        use crate::duplicates::FinderError;

        if let Some(e) = err.downcast_ref::<FinderError>() {
            return match e {
                FinderError::Interrupted => Self::Interrupted,
                FinderError::PathNotFound(_) | FinderError::NotADirectory(_) => Self::ConfigError,
                _ => Self::GeneralError,
            };
        }
        if err.downcast_ref::<ConfigError>().is_some() {
            return Self::ConfigError;
        }
        Self::GeneralError
    }
}

/// Errors detected while building a scan from user input, before any
/// file is hashed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested hash algorithm is not available.
    #[error("Unsupported hash algorithm: {name} (supported: {supported})")]
    UnsupportedAlgorithm {
        /// Name as given by the user
        name: String,
        /// Supported algorithm names
        supported: String,
    },

    /// The requested output format is not available.
    #[error("Unsupported output format: {name} (supported: {supported})")]
    UnsupportedFormat {
        /// Name as given by the user
        name: String,
        /// Supported format names
        supported: String,
    },

    /// The configuration sources could not be merged or parsed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The report destination could not be created.
    #[error("Cannot create output file {}: {source}", path.display())]
    OutputFile {
        /// Requested report path
        path: std::path::PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DF001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::FinderError;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::ConfigError.as_i32(), 2);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_exit_code_for_interrupted() {
        let err = anyhow::Error::new(FinderError::Interrupted);
        assert_eq!(ExitCode::for_error(&err), ExitCode::Interrupted);
    }

    #[test]
    fn test_exit_code_for_bad_path_is_config_error() {
        let err = anyhow::Error::new(FinderError::PathNotFound(PathBuf::from("/nope")));
        assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
    }

    #[test]
    fn test_exit_code_for_config_error_with_context() {
        let err = anyhow::Error::new(ConfigError::Invalid("bad".into())).context("loading config");
        assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
    }

    #[test]
    fn test_exit_code_for_other_error() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    }

    #[test]
    fn test_structured_error_serializes() {
        let err = anyhow::Error::new(FinderError::Interrupted);
        let structured = StructuredError::new(&err, ExitCode::Interrupted);
        let json = serde_json::to_string(&structured).unwrap();

        assert!(json.contains("\"code\":\"DF130\""));
        assert!(json.contains("\"interrupted\":true"));
    }
}
