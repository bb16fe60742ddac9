//! Error types and exit codes for parlint

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Exit code for a clean run with no syntax errors.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code when syntax errors or failed files were found.
pub const EXIT_WITH_ERRORS: u8 = 1;
/// Exit code for fatal configuration errors (nothing was checked).
pub const EXIT_FAILED: u8 = 255;

/// Main error type for parlint operations.
///
/// Every variant is fatal to the whole run: per-file problems are never
/// surfaced through this type, they become diagnostics in the report.
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Unable to execute '{path} -v'")]
    PhpExecutableNotUsable { path: PathBuf },

    #[error("'{path}' is not a valid PHP binary")]
    InvalidPhpBinary { path: PathBuf },

    #[error("Path '{path}' not found")]
    PathNotFound { path: PathBuf },

    #[error("No file found to check")]
    NoFilesFound,

    #[error("Cannot create new process '{command}': {source}")]
    ProcessSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LintError {
    /// All fatal errors terminate the run before (or instead of) producing a
    /// report, so they all map to the same distinct exit status.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(EXIT_FAILED)
    }
}

/// Result type alias for parlint operations
pub type Result<T> = std::result::Result<T, LintError>;
