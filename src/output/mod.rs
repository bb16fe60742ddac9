//! Output renderers
//!
//! A small closed set of renderers behind one trait, selected once at
//! startup. Renderers consume live progress marks during the run and the
//! final [`LintReport`] afterwards.

mod checkstyle;
mod json;
mod text;

pub use checkstyle::CheckstyleOutput;
pub use json::JsonOutput;
pub use text::TextOutput;

use std::io;

use crate::formatter::ErrorFormatter;
use crate::interpreter::PhpExecutable;
use crate::report::{LintReport, Status};

/// Progress and result sink for one run.
pub trait Output {
    /// One completed job; drives live progress without waiting for the report.
    fn status(&mut self, status: Status);

    /// Total number of files, known before the run starts.
    fn set_total_file_count(&mut self, total: usize);

    /// Run preamble (interpreter version, parallelism).
    fn write_header(&mut self, php: &PhpExecutable, parallel_jobs: usize) -> io::Result<()>;

    /// Final report.
    fn write_result(
        &mut self,
        report: &LintReport,
        formatter: &ErrorFormatter,
        ignore_fails: bool,
    ) -> io::Result<()>;
}
