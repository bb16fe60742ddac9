//! Version-gated skip directives
//!
//! A file can opt out of checking by putting a directive on its first line:
//!
//! ```php
//! <?php // lint >= 5.4
//! ```
//!
//! The file is skipped when the interpreter version does not satisfy the
//! constraint. The pre-check runs in-process before a probe is spawned; an
//! unreadable file is not skipped (the lint probe will report it properly).

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\?php\s*//\s*lint\s*([^\d\s]+)\s*([^\s]+)").unwrap());

/// Whether the file's first line carries a directive the interpreter version
/// does not satisfy.
pub fn is_skipped(file: &Path, interpreter_version_id: u32) -> bool {
    let first_line = match read_first_line(file) {
        Some(line) => line,
        None => return false,
    };

    match parse_directive(&first_line) {
        Some((op, required)) => !version_satisfies(interpreter_version_id, &op, required),
        None => false,
    }
}

/// Parse a directive into its operator and required version id.
fn parse_directive(line: &str) -> Option<(String, u32)> {
    let caps = DIRECTIVE_RE.captures(line)?;
    let version = parse_version(&caps[2])?;
    Some((caps[1].to_string(), version))
}

/// Parse `5`, `5.4` or `5.4.1` into a version id (`major*10000 + minor*100 + patch`).
fn parse_version(version: &str) -> Option<u32> {
    let mut parts = version.split('.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next().unwrap_or("0").parse().ok()?;
    let patch: u32 = parts.next().unwrap_or("0").parse().ok()?;
    Some(major * 10000 + minor * 100 + patch)
}

fn version_satisfies(actual: u32, op: &str, required: u32) -> bool {
    match op {
        "<" => actual < required,
        "<=" => actual <= required,
        ">" => actual > required,
        ">=" => actual >= required,
        "=" | "==" => actual == required,
        "!=" | "<>" => actual != required,
        // Unknown operator: treat the constraint as unsatisfied, so the file
        // is skipped rather than linted against the wrong version.
        _ => false,
    }
}

fn read_first_line(file: &Path) -> Option<String> {
    let handle = File::open(file).ok()?;
    let mut line = String::new();
    // take() bounds the read so a minified single-line file cannot balloon it.
    BufReader::new(handle.take(1024))
        .read_line(&mut line)
        .ok()?;
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_no_directive_is_not_skipped() {
        let file = file_with("<?php\necho 'hi';\n");
        assert!(!is_skipped(file.path(), 50400));
    }

    #[test]
    fn test_directive_satisfied_is_not_skipped() {
        let file = file_with("<?php // lint >= 5.4\ntrait Foo {}\n");
        assert!(!is_skipped(file.path(), 50400));
        assert!(!is_skipped(file.path(), 70000));
    }

    #[test]
    fn test_directive_unsatisfied_is_skipped() {
        let file = file_with("<?php // lint >= 5.4\ntrait Foo {}\n");
        assert!(is_skipped(file.path(), 50329));
    }

    #[test]
    fn test_less_than_directive() {
        let file = file_with("<?php // lint < 7.0\n$x = 1;\n");
        assert!(!is_skipped(file.path(), 50600));
        assert!(is_skipped(file.path(), 70012));
    }

    #[test]
    fn test_missing_file_is_not_skipped() {
        assert!(!is_skipped(Path::new("/nonexistent/file.php"), 70000));
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("5.4"), Some(50400));
        assert_eq!(parse_version("7.0.12"), Some(70012));
        assert_eq!(parse_version("5"), Some(50000));
        assert_eq!(parse_version("abc"), None);
    }

    #[test]
    fn test_directive_is_case_insensitive() {
        let file = file_with("<?php // LINT >= 9.9\n");
        assert!(is_skipped(file.path(), 70433));
    }
}
