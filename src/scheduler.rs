//! Bounded worker-pool scheduler
//!
//! A single control thread drives a fill/sleep/reap loop; the actual
//! parallelism comes from the OS running the spawned interpreter processes
//! side by side. The pending queue and in-flight set are owned exclusively by
//! the loop, so no synchronization is needed.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crate::diagnostic::Diagnostic;
use crate::error::Result;
use crate::interpreter::PhpExecutable;
use crate::process::{LintOptions, LintProcess, Outcome};
use crate::report::{LintReport, ResultAggregator, Status};
use crate::skip;

/// Cooperative yield between poll iterations. The process-completion check is
/// non-blocking, so the loop sleeps briefly instead of spinning hot.
const POLL_INTERVAL: Duration = Duration::from_micros(100);

/// The parallel lint engine: dispatches one probe per file, bounded by the
/// configured number of parallel jobs.
pub struct ParallelLint<'a> {
    php: &'a PhpExecutable,
    parallel_jobs: usize,
    options: LintOptions,
}

impl<'a> ParallelLint<'a> {
    pub fn new(php: &'a PhpExecutable, parallel_jobs: usize, options: LintOptions) -> Self {
        Self {
            php,
            parallel_jobs: parallel_jobs.max(1),
            options,
        }
    }

    /// Check all files and aggregate the outcomes.
    ///
    /// Files are dispatched in input order; completions arrive in OS
    /// scheduling order. `callback` is invoked synchronously once per
    /// completed job. A spawn failure aborts the whole run (terminating
    /// whatever is still in flight); any per-file failure is recorded as a
    /// diagnostic and the batch continues.
    pub fn lint<F>(&self, files: Vec<PathBuf>, mut callback: F) -> Result<LintReport>
    where
        F: FnMut(Status, &Path),
    {
        let mut pending: VecDeque<PathBuf> = files.into();
        let mut running: Vec<LintProcess> = Vec::with_capacity(self.parallel_jobs);
        let mut aggregator = ResultAggregator::new();

        let start = Instant::now();

        while !pending.is_empty() || !running.is_empty() {
            // Fill phase: top up the in-flight set from the queue.
            while running.len() < self.parallel_jobs {
                let file = match pending.pop_front() {
                    Some(file) => file,
                    None => break,
                };

                if skip::is_skipped(&file, self.php.version_id()) {
                    aggregator.add_skip();
                    callback(Status::Skip, &file);
                    continue;
                }

                match LintProcess::spawn(self.php, &file, self.options) {
                    Ok(probe) => running.push(probe),
                    Err(e) => {
                        // Orphaned children would outlive the aborted run.
                        for probe in &mut running {
                            probe.terminate();
                        }
                        return Err(e);
                    }
                }
            }

            thread::sleep(POLL_INTERVAL);

            // Reap phase: classify every probe that has finished.
            let mut index = 0;
            while index < running.len() {
                if !running[index].is_finished() {
                    index += 1;
                    continue;
                }

                let mut probe = running.swap_remove(index);
                let file = probe.file().to_path_buf();

                match probe.outcome(self.options) {
                    Outcome::Ok => {
                        aggregator.add_ok();
                        callback(Status::Ok, &file);
                    }
                    Outcome::SyntaxError(message) => {
                        aggregator.add_syntax_error(Diagnostic::syntax_error(
                            file.clone(),
                            message,
                        ));
                        callback(Status::Error, &file);
                    }
                    Outcome::Failure(output) => {
                        aggregator.add_failure(failure_diagnostic(file.clone(), output));
                        callback(Status::Fail, &file);
                    }
                }
            }
        }

        Ok(aggregator.finish(start.elapsed()))
    }
}

fn failure_diagnostic(file: PathBuf, output: String) -> Diagnostic {
    if output.trim().is_empty() {
        let message = format!("Unknown error for file '{}'", file.display());
        Diagnostic::error(file, message)
    } else {
        Diagnostic::error(file, output)
    }
}
