//! Checkstyle XML renderer, for CI systems that ingest the format

use std::io::{self, Write};

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::formatter::ErrorFormatter;
use crate::interpreter::PhpExecutable;
use crate::output::Output;
use crate::report::{LintReport, Status};

pub struct CheckstyleOutput<W: Write> {
    writer: W,
}

impl<W: Write> CheckstyleOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> Output for CheckstyleOutput<W> {
    fn status(&mut self, _status: Status) {}

    fn set_total_file_count(&mut self, _total: usize) {}

    fn write_header(&mut self, _php: &PhpExecutable, _parallel_jobs: usize) -> io::Result<()> {
        writeln!(self.writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)
    }

    fn write_result(
        &mut self,
        report: &LintReport,
        _formatter: &ErrorFormatter,
        _ignore_fails: bool,
    ) -> io::Result<()> {
        writeln!(self.writer, "<checkstyle>")?;

        for (file, diagnostics) in group_by_file(report.diagnostics()) {
            writeln!(self.writer, r#"    <file name="{}">"#, escape_xml(&file))?;
            for diagnostic in diagnostics {
                let (line, source) = match diagnostic.kind() {
                    DiagnosticKind::SyntaxError => {
                        (diagnostic.line().unwrap_or(1), "Syntax Error")
                    }
                    DiagnosticKind::Error => (1, "Linter Error"),
                };
                writeln!(
                    self.writer,
                    r#"        <error line="{}" severity="ERROR" message="{}" source="{}" />"#,
                    line,
                    escape_xml(diagnostic.message()),
                    source
                )?;
            }
            writeln!(self.writer, "    </file>")?;
        }

        writeln!(self.writer, "</checkstyle>")?;
        self.writer.flush()
    }
}

/// Group diagnostics by display path, preserving first-seen file order.
fn group_by_file(diagnostics: &[Diagnostic]) -> Vec<(String, Vec<&Diagnostic>)> {
    let mut groups: Vec<(String, Vec<&Diagnostic>)> = Vec::new();
    for diagnostic in diagnostics {
        let file = diagnostic.short_file_path();
        match groups.iter_mut().find(|(name, _)| *name == file) {
            Some((_, list)) => list.push(diagnostic),
            None => groups.push((file, vec![diagnostic])),
        }
    }
    groups
}

// Attribute values are double-quoted, so apostrophes can stay literal.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
