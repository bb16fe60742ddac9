//! TestRepo builder for integration testing
//!
//! Creates a scratch directory of PHP files plus a stub `php` interpreter so
//! end-to-end runs stay hermetic: files containing `SYNTAX_ERROR` produce a
//! parse error, files containing `CRASH` make the interpreter fail outright.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Stub interpreter reported version; new enough that token translation is off.
pub const STUB_PHP_VERSION: &str = "7.4.33";

const PHP_STUB: &str = r#"#!/bin/sh
for arg; do last="$arg"; done
if [ "$1" = "-v" ]; then
    echo "PHP 7.4.33 (cli) (built for tests)"
    exit 0
fi
if grep -q CRASH "$last" 2>/dev/null; then
    echo "php stub crashed" >&2
    exit 1
fi
if grep -q SYNTAX_ERROR "$last" 2>/dev/null; then
    echo ""
    echo "Parse error: syntax error, unexpected '}' in $last on line 3"
    echo "Errors parsing $last"
    exit 255
fi
echo "No syntax errors detected in $last"
exit 0
"#;

/// Builder for test repository structures checked through the real binary.
pub struct TestRepo {
    dir: TempDir,
    php_stub: PathBuf,
}

impl TestRepo {
    /// Create a new empty test repository with the stub interpreter installed.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let php_stub = dir.path().join("php-stub");
        fs::write(&php_stub, PHP_STUB).expect("Failed to write php stub");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&php_stub, fs::Permissions::from_mode(0o755))
                .expect("Failed to chmod php stub");
        }
        Self { dir, php_stub }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn php_stub(&self) -> &Path {
        &self.php_stub
    }

    /// Add a source file with the given content
    pub fn add_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add `count` clean PHP files named `<prefix><i>.php`
    pub fn add_clean_files(&self, prefix: &str, count: usize) {
        for i in 0..count {
            self.add_file(&format!("{}{}.php", prefix, i), "<?php\necho 'ok';\n");
        }
    }

    /// Run the parlint CLI with the stub interpreter preselected
    pub fn run_cli(&self, args: &[&str]) -> std::io::Result<Output> {
        let mut all_args = vec!["-p", self.php_stub.to_str().unwrap()];
        all_args.extend_from_slice(args);
        self.run_cli_raw(&all_args)
    }

    /// Run the parlint CLI with exactly the given arguments
    pub fn run_cli_raw(&self, args: &[&str]) -> std::io::Result<Output> {
        Command::new(env!("CARGO_BIN_EXE_parlint"))
            .current_dir(self.path())
            .args(args)
            .stdin(Stdio::null())
            .output()
    }

    /// Run the CLI with the given input piped to stdin
    pub fn run_cli_with_stdin(&self, args: &[&str], input: &str) -> std::io::Result<Output> {
        use std::io::Write;

        let mut all_args = vec!["-p", self.php_stub.to_str().unwrap()];
        all_args.extend_from_slice(args);

        let mut child = Command::new(env!("CARGO_BIN_EXE_parlint"))
            .current_dir(self.path())
            .args(&all_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes())?;
        }
        child.wait_with_output()
    }

    /// Initialize as a git repository
    pub fn init_git(&self) -> &Self {
        for args in [
            vec!["init"],
            vec!["config", "user.email", "test@test.com"],
            vec!["config", "user.name", "Test User"],
        ] {
            Command::new("git")
                .current_dir(self.path())
                .args(&args)
                .output()
                .expect("Failed to run git");
        }
        self
    }

    /// Create a git commit with all files
    pub fn commit(&self, message: &str) -> &Self {
        Command::new("git")
            .current_dir(self.path())
            .args(["add", "-A"])
            .output()
            .expect("Failed to git add");
        Command::new("git")
            .current_dir(self.path())
            .args(["commit", "-m", message])
            .output()
            .expect("Failed to git commit");
        self
    }
}

/// Whether a real git binary is available; blame tests soft-skip otherwise.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
