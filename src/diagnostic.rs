//! Diagnostic model for per-file problems
//!
//! Two kinds of diagnostics come out of a run: generic failures (the
//! interpreter process itself died, no line information) and syntax errors
//! (parseable line and message, eligible for snippets and blame). Line
//! extraction and message normalization live here as small regex-driven
//! functions so interpreter format drift stays isolated and unit-testable.

use std::env;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

static LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"on line (\d+)$").unwrap());
static PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(Parse|Fatal) error: ").unwrap());
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"T_[A-Z_]+").unwrap());

/// Legacy token identifiers and the operators they stand for. Interpreters
/// before 5.4 print the bare `T_XXX` name; translation rewrites it to
/// `<operator> (T_XXX)`. Unknown tokens are left unchanged.
const TOKEN_TRANSLATIONS: &[(&str, &str)] = &[
    ("T_FILE", "__FILE__"),
    ("T_FUNC_C", "__FUNCTION__"),
    ("T_HALT_COMPILER", "__halt_compiler()"),
    ("T_INC", "++"),
    ("T_IS_EQUAL", "=="),
    ("T_IS_GREATER_OR_EQUAL", ">="),
    ("T_IS_IDENTICAL", "==="),
    ("T_IS_NOT_IDENTICAL", "!=="),
    ("T_IS_SMALLER_OR_EQUAL", "<="),
    ("T_LINE", "__LINE__"),
    ("T_METHOD_C", "__METHOD__"),
    ("T_MINUS_EQUAL", "-="),
    ("T_MOD_EQUAL", "%="),
    ("T_MUL_EQUAL", "*="),
    ("T_NS_C", "__NAMESPACE__"),
    ("T_NS_SEPARATOR", "\\"),
    ("T_OBJECT_OPERATOR", "->"),
    ("T_OR_EQUAL", "|="),
    ("T_PAAMAYIM_NEKUDOTAYIM", "::"),
    ("T_PLUS_EQUAL", "+="),
    ("T_SL", "<<"),
    ("T_SL_EQUAL", "<<="),
    ("T_SR", ">>"),
    ("T_SR_EQUAL", ">>="),
    ("T_START_HEREDOC", "<<<"),
    ("T_XOR_EQUAL", "^="),
    ("T_ECHO", "echo"),
];

/// Version-control attribution for the line an error was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blame {
    pub name: String,
    pub email: String,
    /// Author time as an RFC 3339 string with the author's timezone.
    pub datetime: String,
    pub commit_hash: String,
    pub summary: String,
}

/// Discriminator between the two diagnostic kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Process-level failure, no line information.
    Error,
    /// Interpreter-reported syntax error with a parseable message.
    SyntaxError,
}

/// A structured, user-facing report of one file's problem.
///
/// Immutable after creation except for blame attachment.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    file: PathBuf,
    message: String,
    kind: DiagnosticKind,
    blame: Option<Blame>,
}

impl Diagnostic {
    pub fn error(file: PathBuf, message: String) -> Self {
        Self {
            file,
            message: message.trim_end().to_string(),
            kind: DiagnosticKind::Error,
            blame: None,
        }
    }

    pub fn syntax_error(file: PathBuf, message: String) -> Self {
        Self {
            file,
            message: message.trim_end().to_string(),
            kind: DiagnosticKind::SyntaxError,
            blame: None,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Raw interpreter message, trailing whitespace stripped.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn blame(&self) -> Option<&Blame> {
        self.blame.as_ref()
    }

    pub fn set_blame(&mut self, blame: Blame) {
        self.blame = Some(blame);
    }

    /// File path relative to the current working directory, for display.
    pub fn short_file_path(&self) -> String {
        match env::current_dir() {
            Ok(cwd) => self
                .file
                .strip_prefix(&cwd)
                .unwrap_or(&self.file)
                .display()
                .to_string(),
            Err(_) => self.file.display().to_string(),
        }
    }

    /// Line number extracted from the trailing `on line N` of the message.
    /// Generic errors and messages without the suffix have no line.
    pub fn line(&self) -> Option<u32> {
        if self.kind != DiagnosticKind::SyntaxError {
            return None;
        }
        extract_line(&self.message)
    }

    /// Message with interpreter framing stripped: the `Parse error: ` /
    /// `Fatal error: ` prefix and the ` in <file> on line <N>` suffix are
    /// removed and the first letter capitalized.
    pub fn normalized_message(&self, translate_tokens: bool) -> String {
        if self.kind != DiagnosticKind::SyntaxError {
            return self.message.clone();
        }

        let message = PREFIX_RE.replace(&self.message, "");

        let basename = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix_re =
            Regex::new(&format!(r" in {} on line \d+$", regex::escape(&basename)))
                .unwrap_or_else(|_| Regex::new(r"$^").unwrap());
        let message = suffix_re.replace(message.as_ref(), "");

        let message = capitalize_first(message.as_ref());

        if translate_tokens {
            translate_legacy_tokens(&message)
        } else {
            message
        }
    }
}

/// Extract the line number from a diagnostic message ending in `on line N`.
pub fn extract_line(message: &str) -> Option<u32> {
    LINE_RE
        .captures(message)
        .and_then(|caps| caps[1].parse().ok())
}

/// Rewrite each known bare `T_XXX` token to `<operator> (T_XXX)`.
pub fn translate_legacy_tokens(message: &str) -> String {
    TOKEN_RE
        .replace_all(message, |caps: &Captures| {
            let token = &caps[0];
            match TOKEN_TRANSLATIONS.iter().find(|(name, _)| *name == token) {
                Some((name, operator)) => format!("{} ({})", operator, name),
                None => token.to_string(),
            }
        })
        .into_owned()
}

fn capitalize_first(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax(file: &str, message: &str) -> Diagnostic {
        Diagnostic::syntax_error(PathBuf::from(file), message.to_string())
    }

    #[test]
    fn test_extract_line() {
        assert_eq!(
            extract_line("Parse error: syntax error, unexpected '}' in foo.php on line 10"),
            Some(10)
        );
        assert_eq!(extract_line("Fatal error: something went wrong"), None);
    }

    #[test]
    fn test_normalized_message_strips_framing() {
        let diag = syntax(
            "foo.php",
            "Parse error: syntax error, unexpected '}' in foo.php on line 10",
        );
        assert_eq!(
            diag.normalized_message(false),
            "Syntax error, unexpected '}'"
        );
        assert_eq!(diag.line(), Some(10));
    }

    #[test]
    fn test_normalized_message_fatal_prefix() {
        let diag = syntax(
            "src/a.php",
            "Fatal error: Cannot redeclare foo() in a.php on line 4",
        );
        assert_eq!(diag.normalized_message(false), "Cannot redeclare foo()");
    }

    #[test]
    fn test_normalized_message_without_suffix() {
        let diag = syntax("foo.php", "Parse error: unexpected end of file");
        assert_eq!(diag.normalized_message(false), "Unexpected end of file");
        assert_eq!(diag.line(), None);
    }

    #[test]
    fn test_token_translation_enabled() {
        let diag = syntax(
            "foo.php",
            "Parse error: syntax error, unexpected T_IS_IDENTICAL in foo.php on line 3",
        );
        assert_eq!(
            diag.normalized_message(true),
            "Syntax error, unexpected === (T_IS_IDENTICAL)"
        );
    }

    #[test]
    fn test_token_translation_disabled() {
        let diag = syntax(
            "foo.php",
            "Parse error: syntax error, unexpected T_IS_IDENTICAL in foo.php on line 3",
        );
        assert_eq!(
            diag.normalized_message(false),
            "Syntax error, unexpected T_IS_IDENTICAL"
        );
    }

    #[test]
    fn test_unknown_token_left_unchanged() {
        assert_eq!(
            translate_legacy_tokens("unexpected T_TOTALLY_MADE_UP here"),
            "unexpected T_TOTALLY_MADE_UP here"
        );
    }

    #[test]
    fn test_object_operator_translation() {
        assert_eq!(
            translate_legacy_tokens("expected T_OBJECT_OPERATOR or T_PAAMAYIM_NEKUDOTAYIM"),
            "expected -> (T_OBJECT_OPERATOR) or :: (T_PAAMAYIM_NEKUDOTAYIM)"
        );
    }

    #[test]
    fn test_generic_error_has_no_line() {
        let diag = Diagnostic::error(
            PathBuf::from("foo.php"),
            "php exploded on line 3".to_string(),
        );
        assert_eq!(diag.line(), None);
        assert_eq!(diag.normalized_message(true), "php exploded on line 3");
    }

    #[test]
    fn test_message_trailing_whitespace_trimmed() {
        let diag = Diagnostic::error(PathBuf::from("foo.php"), "boom\n\n".to_string());
        assert_eq!(diag.message(), "boom");
    }
}
