//! Run result aggregation
//!
//! One [`ResultAggregator`] value is owned by the scheduler loop (never shared
//! state) and folded into an immutable [`LintReport`] when the run ends.

use std::time::Duration;

use crate::diagnostic::Diagnostic;

/// Per-job completion status, delivered synchronously through the scheduler
/// callback so renderers can show live progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// File parsed cleanly.
    Ok,
    /// File excluded by a skip directive.
    Skip,
    /// Syntax error found.
    Error,
    /// The check process itself failed.
    Fail,
}

/// Aggregated outcome of one scheduler run. Immutable once built.
#[derive(Debug)]
pub struct LintReport {
    checked_files: usize,
    skipped_files: usize,
    files_with_syntax_error: usize,
    failed_files: usize,
    diagnostics: Vec<Diagnostic>,
    elapsed: Duration,
}

impl LintReport {
    /// Files actually linted: clean files plus files with syntax errors.
    /// Skipped and failed files are excluded.
    pub fn checked_files(&self) -> usize {
        self.checked_files
    }

    pub fn skipped_files(&self) -> usize {
        self.skipped_files
    }

    pub fn files_with_syntax_error(&self) -> usize {
        self.files_with_syntax_error
    }

    pub fn failed_files(&self) -> usize {
        self.failed_files
    }

    /// Diagnostics in completion order (nondeterministic across runs unless
    /// the run was serialized with one parallel job).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut [Diagnostic] {
        &mut self.diagnostics
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn has_syntax_error(&self) -> bool {
        self.files_with_syntax_error > 0
    }

    /// Any diagnostic at all: syntax error or process failure.
    pub fn has_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_files > 0
    }
}

/// Mutable counters and the growing diagnostics list for one run in progress.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    checked_files: usize,
    skipped_files: usize,
    files_with_syntax_error: usize,
    failed_files: usize,
    diagnostics: Vec<Diagnostic>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_ok(&mut self) {
        self.checked_files += 1;
    }

    pub fn add_skip(&mut self) {
        self.skipped_files += 1;
    }

    pub fn add_syntax_error(&mut self, diagnostic: Diagnostic) {
        self.checked_files += 1;
        self.files_with_syntax_error += 1;
        self.diagnostics.push(diagnostic);
    }

    pub fn add_failure(&mut self, diagnostic: Diagnostic) {
        self.failed_files += 1;
        self.diagnostics.push(diagnostic);
    }

    pub fn finish(self, elapsed: Duration) -> LintReport {
        LintReport {
            checked_files: self.checked_files,
            skipped_files: self.skipped_files,
            files_with_syntax_error: self.files_with_syntax_error,
            failed_files: self.failed_files,
            diagnostics: self.diagnostics,
            elapsed,
        }
    }
}
