//! Blame probe: version-control attribution for one file/line
//!
//! Runs `git blame` in porcelain mode restricted to the single diagnostic
//! line and parses the labeled fields. Everything here fails softly: blame is
//! best-effort enrichment and must never abort a run.

use std::path::Path;
use std::process::Command;

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostic::Blame;
use crate::error::Result;
use crate::process::Process;

static AUTHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^author (.*)$").unwrap());
static AUTHOR_MAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^author-mail <(.*)>$").unwrap());
static AUTHOR_TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^author-time (\d+)$").unwrap());
static AUTHOR_TZ_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^author-tz ([+-]\d{4})$").unwrap());
static SUMMARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^summary (.*)$").unwrap());

/// One in-flight `git blame -p -L <line>,+1` invocation.
pub struct GitBlameProcess {
    process: Process,
}

impl GitBlameProcess {
    /// Spawn a blame probe for one line of one file.
    ///
    /// Runs in the file's parent directory so relative and absolute paths
    /// both resolve inside the repository.
    pub fn spawn(git: &str, file: &Path, line: u32) -> Result<Self> {
        let mut command = Command::new(git);
        command
            .arg("blame")
            .arg("-p")
            .arg("-L")
            .arg(format!("{},+1", line));

        if let (Some(parent), Some(name)) = (file.parent(), file.file_name()) {
            if !parent.as_os_str().is_empty() {
                command.current_dir(parent);
            }
            command.arg(name);
        } else {
            command.arg(file);
        }

        Ok(Self {
            process: Process::spawn(&mut command, None)?,
        })
    }

    pub fn is_finished(&mut self) -> bool {
        self.process.is_finished()
    }

    /// Parsed attribution, or `None` when the command failed (file untracked,
    /// not a repository, line out of range) or the output was malformed.
    pub fn blame(&mut self) -> Option<Blame> {
        if self.process.status_code() != 0 {
            return None;
        }
        let output = self.process.output().to_string();
        parse_porcelain(&output)
    }
}

/// Whether a usable git binary is available.
pub fn git_exists(git: &str) -> bool {
    Command::new(git)
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Blocking convenience wrapper used by the enrichment pass: spawn the probe,
/// wait for it, swallow every failure.
pub fn blame_for_line(git: &str, file: &Path, line: u32) -> Option<Blame> {
    let mut probe = GitBlameProcess::spawn(git, file, line).ok()?;
    probe.blame()
}

/// Parse git's porcelain blame output: the commit hash is the first
/// whitespace-delimited token of the first line, the remaining fields come
/// from labeled lines.
fn parse_porcelain(output: &str) -> Option<Blame> {
    let commit_hash = output
        .lines()
        .next()?
        .split_whitespace()
        .next()?
        .to_string();

    let name = AUTHOR_RE.captures(output)?[1].to_string();
    let email = AUTHOR_MAIL_RE.captures(output)?[1].to_string();
    let summary = SUMMARY_RE.captures(output)?[1].to_string();

    let time: i64 = AUTHOR_TIME_RE.captures(output)?[1].parse().ok()?;
    let tz = &AUTHOR_TZ_RE.captures(output)?[1];
    let datetime = combine_instant(time, tz)?;

    Some(Blame {
        name,
        email,
        datetime: datetime.to_rfc3339(),
        commit_hash,
        summary,
    })
}

/// Combine a unix timestamp and a `+HHMM` timezone into an absolute instant.
fn combine_instant(unix_time: i64, tz: &str) -> Option<DateTime<FixedOffset>> {
    let sign = if tz.starts_with('-') { -1 } else { 1 };
    let hours: i32 = tz.get(1..3)?.parse().ok()?;
    let minutes: i32 = tz.get(3..5)?.parse().ok()?;
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?;

    DateTime::from_timestamp(unix_time, 0).map(|utc| utc.with_timezone(&offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORCELAIN: &str = "\
49a91845a7e6857d1e8ba40f6aee9f2d2bfcb510 10 10 1
author Jakub Onderka
author-mail <jakub.onderka@example.com>
author-time 1541584747
author-tz +0100
committer Jakub Onderka
committer-mail <jakub.onderka@example.com>
committer-time 1541584747
committer-tz +0100
summary Fix parsing of short arrays
filename src/Parser.php
\tsome line content
";

    #[test]
    fn test_parse_porcelain_fields() {
        let blame = parse_porcelain(PORCELAIN).unwrap();
        assert_eq!(
            blame.commit_hash,
            "49a91845a7e6857d1e8ba40f6aee9f2d2bfcb510"
        );
        assert_eq!(blame.name, "Jakub Onderka");
        assert_eq!(blame.email, "jakub.onderka@example.com");
        assert_eq!(blame.summary, "Fix parsing of short arrays");
        assert_eq!(blame.datetime, "2018-11-07T10:59:07+01:00");
    }

    #[test]
    fn test_parse_porcelain_malformed_is_none() {
        assert!(parse_porcelain("").is_none());
        assert!(parse_porcelain("deadbeef 1 1 1\nauthor Someone\n").is_none());
    }

    #[test]
    fn test_combine_instant_negative_offset() {
        let dt = combine_instant(1541584747, "-0500").unwrap();
        assert_eq!(dt.to_rfc3339(), "2018-11-07T04:59:07-05:00");
    }
}
