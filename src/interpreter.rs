//! PHP interpreter discovery and validation
//!
//! Resolving the interpreter is the first step of every run: an unusable
//! binary is a fatal configuration error surfaced before any file is checked.

use std::path::{Path, PathBuf};
use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{LintError, Result};

/// `php -v` exits 0 normally and 255 for some fatal-but-versioned setups;
/// both prove the binary is runnable.
const VERSION_PROBE_OK: &[i32] = &[0, 255];

static PHP_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PHP (\d+)\.(\d+)\.(\d+)").unwrap());

/// A validated PHP executable with its parsed version.
#[derive(Debug, Clone)]
pub struct PhpExecutable {
    path: PathBuf,
    /// Version encoded as `major * 10000 + minor * 100 + patch`,
    /// mirroring PHP's own `PHP_VERSION_ID` constant.
    version_id: u32,
}

impl PhpExecutable {
    /// Resolve and validate an interpreter.
    ///
    /// A bare command name is looked up on `PATH`; an explicit path is used
    /// as-is. The binary is then probed with `-v` and its version parsed.
    pub fn resolve(executable: &str) -> Result<Self> {
        let path = which::which(executable).unwrap_or_else(|_| PathBuf::from(executable));
        Self::probe(&path)
    }

    fn probe(path: &Path) -> Result<Self> {
        let output = Command::new(path)
            .arg("-v")
            .output()
            .map_err(|_| LintError::PhpExecutableNotUsable {
                path: path.to_path_buf(),
            })?;

        let code = output.status.code().unwrap_or(-1);
        if !VERSION_PROBE_OK.contains(&code) {
            return Err(LintError::PhpExecutableNotUsable {
                path: path.to_path_buf(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let version_id = parse_version_id(&stdout).ok_or_else(|| LintError::InvalidPhpBinary {
            path: path.to_path_buf(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            version_id,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version_id(&self) -> u32 {
        self.version_id
    }

    /// Human-readable `X.Y.Z` form of the version id.
    pub fn version_string(&self) -> String {
        format!(
            "{}.{}.{}",
            self.version_id / 10000,
            self.version_id / 100 % 100,
            self.version_id % 100
        )
    }

    /// Interpreters older than 5.4 print bare `T_XXX` token identifiers in
    /// parse errors; newer ones include the human-readable operator.
    pub fn needs_token_translation(&self) -> bool {
        self.version_id < 50400
    }

    /// Test-only constructor so scheduler and formatter tests can target a
    /// stub interpreter without probing it.
    #[doc(hidden)]
    pub fn with_version(path: PathBuf, version_id: u32) -> Self {
        Self { path, version_id }
    }
}

/// Parse the first `PHP X.Y.Z` occurrence from `php -v` output.
pub fn parse_version_id(output: &str) -> Option<u32> {
    let caps = PHP_VERSION_RE.captures(output)?;
    let major: u32 = caps[1].parse().ok()?;
    let minor: u32 = caps[2].parse().ok()?;
    let patch: u32 = caps[3].parse().ok()?;
    Some(major * 10000 + minor * 100 + patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_id() {
        let out = "PHP 7.4.33 (cli) (built: Nov 26 2022 14:07:36) ( NTS )";
        assert_eq!(parse_version_id(out), Some(70433));

        let out = "PHP 5.3.29 (cli)";
        assert_eq!(parse_version_id(out), Some(50329));
    }

    #[test]
    fn test_parse_version_id_rejects_garbage() {
        assert_eq!(parse_version_id("Python 3.11.4"), None);
        assert_eq!(parse_version_id(""), None);
    }

    #[test]
    fn test_version_string_roundtrip() {
        let php = PhpExecutable::with_version(PathBuf::from("php"), 70433);
        assert_eq!(php.version_string(), "7.4.33");
        assert!(!php.needs_token_translation());

        let old = PhpExecutable::with_version(PathBuf::from("php"), 50329);
        assert!(old.needs_token_translation());
    }

    #[test]
    fn test_resolve_missing_binary_is_fatal() {
        let err = PhpExecutable::resolve("/nonexistent/php-for-parlint").unwrap_err();
        assert!(matches!(err, LintError::PhpExecutableNotUsable { .. }));
    }
}
