//! Resolving the set of files to check
//!
//! Paths given as files are taken as-is; directories are walked recursively
//! and filtered by extension; excluded prefixes prune the walk. A path that
//! does not exist is a fatal configuration error.

use std::io::Read;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::{LintError, Result};

/// Extensions checked by default when walking directories.
pub const DEFAULT_EXTENSIONS: &[&str] = &["php", "php3", "php4", "php5", "phtml", "phpt"];

/// Expand paths into the flat list of files to check, in deterministic order.
pub fn resolve_files(
    paths: &[PathBuf],
    extensions: &[String],
    excluded: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            // Explicitly named files bypass the extension filter.
            files.push(path.clone());
        } else if path.is_dir() {
            walk_directory(path, extensions, excluded, &mut files)?;
        } else {
            return Err(LintError::PathNotFound { path: path.clone() });
        }
    }

    Ok(files)
}

fn walk_directory(
    root: &Path,
    extensions: &[String],
    excluded: &[PathBuf],
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let excluded: Vec<PathBuf> = excluded.iter().map(|prefix| normalize(prefix)).collect();
    let walk = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_path(|a, b| a.cmp(b))
        .filter_entry(move |entry| !is_excluded(entry.path(), &excluded))
        .build();

    for entry in walk {
        let entry =
            entry.map_err(|e| LintError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        let path = entry.path();
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if has_extension(path, extensions) {
            files.push(path.to_path_buf());
        }
    }

    Ok(())
}

/// Drop `.` components so `./vendor/x.php` and `vendor` compare equal.
/// Walk entries under a relative root carry a leading `./` that a bare
/// exclusion prefix does not.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

/// `excluded` prefixes must already be normalized.
fn is_excluded(path: &Path, excluded: &[PathBuf]) -> bool {
    let path = normalize(path);
    excluded.iter().any(|prefix| path.starts_with(prefix))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy();
            extensions.iter().any(|wanted| wanted == ext.as_ref())
        }
        None => false,
    }
}

/// Newline-separated paths read from standard input (`--stdin`).
pub fn paths_from_stdin() -> Result<Vec<PathBuf>> {
    let mut content = String::new();
    std::io::stdin().read_to_string(&mut content)?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}
