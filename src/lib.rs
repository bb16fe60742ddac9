//! parlint: parallel syntax checker for PHP codebases
//!
//! Checks many PHP files for syntax validity by invoking `php -l` on each
//! file, running the checks concurrently through a bounded worker pool, and
//! aggregating the outcomes into a structured report. The orchestrator is a
//! single control thread; the parallelism comes from the OS running the
//! spawned interpreter processes side by side.
//!
//! # Example
//!
//! ```no_run
//! use parlint::{LintOptions, ParallelLint, PhpExecutable};
//! use std::path::PathBuf;
//!
//! let php = PhpExecutable::resolve("php")?;
//! let engine = ParallelLint::new(&php, 10, LintOptions::default());
//! let report = engine.lint(vec![PathBuf::from("index.php")], |status, file| {
//!     eprintln!("{:?} {}", status, file.display());
//! })?;
//! assert!(!report.has_error());
//! # Ok::<(), parlint::LintError>(())
//! ```

pub mod cli;
pub mod diagnostic;
pub mod error;
pub mod finder;
pub mod formatter;
pub mod interpreter;
pub mod output;
pub mod process;
pub mod report;
pub mod scheduler;
pub mod skip;

// Re-export commonly used types
pub use cli::{Cli, OutputFormat};
pub use diagnostic::{Blame, Diagnostic, DiagnosticKind};
pub use error::{LintError, Result, EXIT_FAILED, EXIT_SUCCESS, EXIT_WITH_ERRORS};
pub use formatter::ErrorFormatter;
pub use interpreter::PhpExecutable;
pub use output::{CheckstyleOutput, JsonOutput, Output, TextOutput};
pub use process::{GitBlameProcess, LintOptions, LintProcess, Outcome, Process};
pub use report::{LintReport, ResultAggregator, Status};
pub use scheduler::ParallelLint;
