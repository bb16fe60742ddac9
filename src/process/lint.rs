//! Lint probe: one `php -l` invocation for one file
//!
//! The probe owns the interpreter invocation contract (lint-only mode, no
//! php.ini, dialect switches, verbose error reporting) and the classification
//! of its textual output into an [`Outcome`].

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::Result;
use crate::interpreter::PhpExecutable;
use crate::process::Process;

/// Marker substring php prints on clean files.
const SUCCESS_MARKER: &str = "No syntax errors detected";
const FATAL_ERROR: &str = "Fatal error";
const PARSE_ERROR: &str = "Parse error";
const DEPRECATED: &str = "Deprecated:";

/// Source-dialect switches passed through to the interpreter per file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LintOptions {
    /// Set `short_open_tag=On` (`<?` and `<?=` in legacy code).
    pub short_tag: bool,
    /// Set `asp_tags=On` (`<% %>` style tags).
    pub asp_tags: bool,
    /// Also report `Deprecated:` lines as syntax diagnostics.
    pub show_deprecated: bool,
}

/// Classified result of one finished lint probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// File parsed cleanly.
    Ok,
    /// Interpreter reported a syntax problem; the raw diagnostic line.
    SyntaxError(String),
    /// The interpreter process itself failed; raw stderr (or stdout).
    Failure(String),
}

/// One in-flight `php -l` check.
pub struct LintProcess {
    process: Process,
    file: PathBuf,
}

impl LintProcess {
    /// Spawn the interpreter in lint-only mode on one file.
    ///
    /// `-n` disables php.ini so the run is not affected by local
    /// configuration; `error_reporting=E_ALL` forces verbose diagnostics.
    pub fn spawn(php: &PhpExecutable, file: &Path, options: LintOptions) -> Result<Self> {
        let mut command = Command::new(php.path());
        command
            .arg("-d")
            .arg(format!("asp_tags={}", on_off(options.asp_tags)))
            .arg("-d")
            .arg(format!("short_open_tag={}", on_off(options.short_tag)))
            .arg("-d")
            .arg("error_reporting=E_ALL")
            .arg("-n")
            .arg("-l")
            .arg(file);

        Ok(Self {
            process: Process::spawn(&mut command, None)?,
            file: file.to_path_buf(),
        })
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Non-blocking completion check, delegated to the process handle.
    pub fn is_finished(&mut self) -> bool {
        self.process.is_finished()
    }

    /// Kill a still-running probe when the run is aborted.
    pub fn terminate(&mut self) {
        self.process.terminate();
    }

    /// Classify the finished probe's output.
    pub fn outcome(&mut self, options: LintOptions) -> Outcome {
        if self.process.is_fail() {
            let stderr = self.process.error_output().to_string();
            let raw = if stderr.trim().is_empty() {
                self.process.output().to_string()
            } else {
                stderr
            };
            return Outcome::Failure(raw);
        }

        let stdout = self.process.output().to_string();
        classify_output(&stdout, options.show_deprecated)
    }
}

/// Classify interpreter stdout, evaluated on the first matching line.
///
/// Kept as a standalone function so format drift between interpreter versions
/// stays unit-testable without spawning processes.
pub fn classify_output(stdout: &str, show_deprecated: bool) -> Outcome {
    if stdout.contains(SUCCESS_MARKER) {
        return Outcome::Ok;
    }

    for line in stdout.lines() {
        if line.contains(FATAL_ERROR)
            || line.contains(PARSE_ERROR)
            || (show_deprecated && line.contains(DEPRECATED))
        {
            return Outcome::SyntaxError(line.trim().to_string());
        }
    }

    // Missing success marker but no recognizable diagnostic line either:
    // the interpreter emitted something this version of the classifier does
    // not understand.
    tracing::warn!(
        output = %stdout.trim(),
        "lint output contains neither success marker nor a diagnostic line"
    );
    Outcome::Failure(stdout.to_string())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "On"
    } else {
        "Off"
    }
}
