//! JSON renderer
//!
//! Machine-readable serialization of the report: counts plus one object per
//! diagnostic with a `type` discriminator (`error` / `syntaxError`), nullable
//! line and blame, and both the raw and the normalized message.

use std::io::{self, Write};

use serde_json::json;

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::formatter::ErrorFormatter;
use crate::interpreter::PhpExecutable;
use crate::output::Output;
use crate::report::{LintReport, Status};

pub struct JsonOutput<W: Write> {
    writer: W,
    translate_tokens: bool,
    php_version_id: u32,
    parallel_jobs: usize,
}

impl<W: Write> JsonOutput<W> {
    pub fn new(writer: W, translate_tokens: bool) -> Self {
        Self {
            writer,
            translate_tokens,
            php_version_id: 0,
            parallel_jobs: 0,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn diagnostic_json(&self, diagnostic: &Diagnostic) -> serde_json::Value {
        match diagnostic.kind() {
            DiagnosticKind::Error => json!({
                "type": "error",
                "file": diagnostic.file().display().to_string(),
                "message": diagnostic.message(),
            }),
            DiagnosticKind::SyntaxError => json!({
                "type": "syntaxError",
                "file": diagnostic.file().display().to_string(),
                "line": diagnostic.line(),
                "message": diagnostic.message(),
                "normalizedMessage": diagnostic.normalized_message(self.translate_tokens),
                "blame": diagnostic.blame(),
            }),
        }
    }
}

impl<W: Write> Output for JsonOutput<W> {
    fn status(&mut self, _status: Status) {}

    fn set_total_file_count(&mut self, _total: usize) {}

    fn write_header(&mut self, php: &PhpExecutable, parallel_jobs: usize) -> io::Result<()> {
        // Deferred: JSON is emitted as one document in write_result.
        self.php_version_id = php.version_id();
        self.parallel_jobs = parallel_jobs;
        Ok(())
    }

    fn write_result(
        &mut self,
        report: &LintReport,
        _formatter: &ErrorFormatter,
        _ignore_fails: bool,
    ) -> io::Result<()> {
        let errors: Vec<serde_json::Value> = report
            .diagnostics()
            .iter()
            .map(|diagnostic| self.diagnostic_json(diagnostic))
            .collect();

        let document = json!({
            "phpVersion": self.php_version_id,
            "parallelJobs": self.parallel_jobs,
            "results": {
                "checkedFiles": report.checked_files(),
                "skippedFiles": report.skipped_files(),
                "filesWithSyntaxError": report.files_with_syntax_error(),
                "failedFiles": report.failed_files(),
                "testTime": report.elapsed().as_secs_f64(),
                "errors": errors,
            },
        });

        writeln!(self.writer, "{}", document)?;
        self.writer.flush()
    }
}
