//! Plain-text renderer with live progress marks

use std::io::{self, Write};

use console::Style;

use crate::formatter::ErrorFormatter;
use crate::interpreter::PhpExecutable;
use crate::output::Output;
use crate::report::{LintReport, Status};

const FILES_PER_LINE: usize = 60;

pub struct TextOutput<W: Write> {
    writer: W,
    show_progress: bool,
    use_colors: bool,
    marks_written: usize,
    total_file_count: usize,
}

impl<W: Write> TextOutput<W> {
    pub fn new(writer: W, show_progress: bool, use_colors: bool) -> Self {
        Self {
            writer,
            show_progress,
            use_colors,
            marks_written: 0,
            total_file_count: 0,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn styled(&self, style: Style, text: &str) -> String {
        if self.use_colors {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn write_mark(&mut self, mark: &str) -> io::Result<()> {
        self.marks_written += 1;
        if !self.show_progress {
            return Ok(());
        }
        write!(self.writer, "{}", mark)?;
        if self.marks_written % FILES_PER_LINE == 0 {
            self.write_percent()?;
        }
        self.writer.flush()
    }

    fn write_percent(&mut self) -> io::Result<()> {
        let percent = if self.total_file_count == 0 {
            100
        } else {
            self.marks_written * 100 / self.total_file_count
        };
        let width = self.total_file_count.to_string().len();
        writeln!(
            self.writer,
            " {:>width$}/{} ({} %)",
            self.marks_written, self.total_file_count, percent
        )
    }

    fn summary_line(report: &LintReport, ignore_fails: bool) -> String {
        let mut message = if report.has_syntax_error() {
            format!(
                "Syntax error found in {} {}",
                report.files_with_syntax_error(),
                plural(report.files_with_syntax_error(), "file", "files")
            )
        } else {
            "No syntax error found".to_string()
        };

        if report.has_failures() {
            message.push_str(&format!(
                ", failed to check {} {}",
                report.failed_files(),
                plural(report.failed_files(), "file", "files")
            ));
            if ignore_fails {
                message.push_str(" (ignored)");
            }
        }

        message
    }
}

impl<W: Write> Output for TextOutput<W> {
    fn status(&mut self, status: Status) {
        let mark = match status {
            Status::Ok => ".".to_string(),
            Status::Skip => self.styled(Style::new().yellow(), "S"),
            Status::Error => self.styled(Style::new().red().bold(), "X"),
            Status::Fail => "-".to_string(),
        };
        let _ = self.write_mark(&mark);
    }

    fn set_total_file_count(&mut self, total: usize) {
        self.total_file_count = total;
    }

    fn write_header(&mut self, php: &PhpExecutable, parallel_jobs: usize) -> io::Result<()> {
        let jobs = if parallel_jobs == 1 {
            "1 job".to_string()
        } else {
            format!("{} parallel jobs", parallel_jobs)
        };
        writeln!(self.writer, "PHP {} | {}", php.version_string(), jobs)
    }

    fn write_result(
        &mut self,
        report: &LintReport,
        formatter: &ErrorFormatter,
        ignore_fails: bool,
    ) -> io::Result<()> {
        if self.show_progress {
            if self.marks_written % FILES_PER_LINE != 0 {
                let rest = FILES_PER_LINE - self.marks_written % FILES_PER_LINE;
                write!(self.writer, "{}", " ".repeat(rest))?;
                self.write_percent()?;
            }
            writeln!(self.writer)?;
        }

        let seconds = format_seconds(report.elapsed().as_secs_f64());
        let mut checked = format!(
            "Checked {} files in {} {}",
            report.checked_files(),
            seconds,
            plural_seconds(&seconds)
        );
        if report.skipped_files() > 0 {
            checked.push_str(&format!(
                ", skipped {} {}",
                report.skipped_files(),
                plural(report.skipped_files(), "file", "files")
            ));
        }
        writeln!(self.writer, "{}", checked)?;

        let summary = Self::summary_line(report, ignore_fails);
        let has_error = if ignore_fails {
            report.has_syntax_error()
        } else {
            report.has_error()
        };
        let style = if has_error {
            Style::new().red()
        } else {
            Style::new().green()
        };
        writeln!(self.writer, "{}", self.styled(style, &summary))?;

        for diagnostic in report.diagnostics() {
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", "-".repeat(60))?;
            writeln!(self.writer, "{}", formatter.format(diagnostic))?;
        }

        self.writer.flush()
    }
}

/// Elapsed time rounded to one decimal, rendered without a trailing `.0`.
fn format_seconds(seconds: f64) -> String {
    let rounded = (seconds * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as u64)
    } else {
        format!("{:.1}", rounded)
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}

fn plural_seconds(rendered: &str) -> &'static str {
    if rendered == "1" {
        "second"
    } else {
        "seconds"
    }
}
