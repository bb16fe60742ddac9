//! Human-readable rendering of diagnostics
//!
//! Syntax errors get a header with the relative path and line, a short source
//! snippet with the offending line marked, the normalized message and an
//! optional blame attribution. Generic failures are printed as-is.

use std::fs;
use std::path::Path;

use console::Style;

use crate::diagnostic::{Diagnostic, DiagnosticKind};

/// Context lines shown around the offending line.
const SNIPPET_LINES_BEFORE: usize = 2;
const SNIPPET_LINES_AFTER: usize = 2;

pub struct ErrorFormatter {
    use_colors: bool,
    translate_tokens: bool,
}

impl ErrorFormatter {
    pub fn new(use_colors: bool, translate_tokens: bool) -> Self {
        Self {
            use_colors,
            translate_tokens,
        }
    }

    /// Render one diagnostic.
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        match diagnostic.kind() {
            DiagnosticKind::SyntaxError => self.format_syntax_error(diagnostic),
            DiagnosticKind::Error => {
                if diagnostic.message().is_empty() {
                    format!("Unknown error for file '{}'", diagnostic.short_file_path())
                } else {
                    diagnostic.message().to_string()
                }
            }
        }
    }

    fn format_syntax_error(&self, diagnostic: &Diagnostic) -> String {
        let mut out = format!("Parse error: {}", diagnostic.short_file_path());

        if let Some(line) = diagnostic.line() {
            out.push_str(&format!(":{}\n", line));
            if let Some(snippet) = self.code_snippet(diagnostic.file(), line as usize) {
                out.push_str(&snippet);
            }
        } else {
            out.push('\n');
        }

        out.push_str(&diagnostic.normalized_message(self.translate_tokens));

        if let Some(blame) = diagnostic.blame() {
            let short_hash: String = blame.commit_hash.chars().take(8).collect();
            out.push_str(&format!(
                "\nBlame {} <{}>, commit '{}' from {}",
                blame.name, blame.email, short_hash, blame.datetime
            ));
        }

        out
    }

    /// Render the source window around `line` (1-based), clamped at both file
    /// boundaries. Returns `None` when the file cannot be read.
    fn code_snippet(&self, file: &Path, line: usize) -> Option<String> {
        let content = fs::read_to_string(file).ok()?;
        let lines: Vec<&str> = content.lines().collect();
        if line == 0 || line > lines.len() {
            return None;
        }

        let first = line.saturating_sub(SNIPPET_LINES_BEFORE + 1); // 0-based
        let last = (line + SNIPPET_LINES_AFTER).min(lines.len()); // exclusive
        let width = last.to_string().len();

        let marked = Style::new().red();
        let mut snippet = String::new();
        for (index, text) in lines[first..last].iter().enumerate() {
            let number = first + index + 1;
            let is_offending = number == line;
            let marker = if is_offending { "  > " } else { "    " };
            let rendered = format!("{}{:>width$}| {}", marker, number, text.trim_end());
            if is_offending && self.use_colors {
                snippet.push_str(&marked.apply_to(rendered).to_string());
            } else {
                snippet.push_str(&rendered);
            }
            snippet.push('\n');
        }

        Some(snippet)
    }
}
