//! Resource lifecycle: descriptors and process-table entries must return to
//! baseline after a large run.
//!
//! Lives in its own test binary so no sibling test spawns processes while the
//! descriptor table is being compared.

#![cfg(target_os = "linux")]

mod common;

use common::TestRepo;
use parlint::{LintOptions, ParallelLint, PhpExecutable};

fn open_fd_count() -> usize {
    std::fs::read_dir("/proc/self/fd").unwrap().count()
}

fn child_process_count() -> usize {
    let children =
        std::fs::read_to_string(format!("/proc/self/task/{}/children", std::process::id()))
            .unwrap_or_default();
    children.split_whitespace().count()
}

#[test]
fn test_descriptors_return_to_baseline_after_large_run() {
    let repo = TestRepo::new();
    let files: Vec<_> = (0..300)
        .map(|i| repo.add_file(&format!("f{}.php", i), "<?php\necho 1;\n"))
        .collect();
    let php = PhpExecutable::resolve(repo.php_stub().to_str().unwrap()).unwrap();

    // Warm lazy initialization before taking the baseline.
    let _ = open_fd_count();
    let baseline_fds = open_fd_count();

    let engine = ParallelLint::new(&php, 8, LintOptions::default());
    let report = engine.lint(files, |_, _| {}).unwrap();
    assert_eq!(report.checked_files(), 300);
    assert!(!report.has_error());

    // Every pipe was drained and closed, every child reaped.
    assert_eq!(open_fd_count(), baseline_fds);
    assert_eq!(child_process_count(), 0);
}
