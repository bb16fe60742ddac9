//! CLI argument definitions using clap
//!
//! One flat command: paths to check plus switches controlling the
//! interpreter, the scheduler and the output renderer.

use clap::Parser;
use std::path::PathBuf;

use crate::process::LintOptions;

/// Parallel syntax checker for PHP codebases
#[derive(Parser, Debug)]
#[command(name = "parlint")]
#[command(about = "Checks PHP files for syntax errors by running php -l in parallel")]
#[command(version)]
pub struct Cli {
    /// Files or directories to check
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// PHP executable to run
    #[arg(short = 'p', long = "php", value_name = "PHP", default_value = "php")]
    pub php: String,

    /// Set short_open_tag to On (default Off)
    #[arg(short = 's', long = "short")]
    pub short_tag: bool,

    /// Set asp_tags to On (default Off)
    #[arg(short = 'a', long = "asp")]
    pub asp_tags: bool,

    /// Check only files with these extensions, comma separated
    #[arg(
        short = 'e',
        long = "ext",
        value_name = "EXT",
        value_delimiter = ',',
        default_value = "php,php3,php4,php5,phtml,phpt"
    )]
    pub extensions: Vec<String>,

    /// Number of jobs running in parallel
    #[arg(short = 'j', long = "jobs", value_name = "NUM", default_value_t = 10)]
    pub parallel_jobs: usize,

    /// Exclude a file or directory (repeat for multiple items)
    #[arg(long = "exclude", value_name = "PATH")]
    pub excluded: Vec<PathBuf>,

    /// Output results as JSON
    #[arg(long, conflicts_with = "checkstyle")]
    pub json: bool,

    /// Output results as Checkstyle XML
    #[arg(long)]
    pub checkstyle: bool,

    /// Disable progress marks in text output
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Enable colors (disables auto detection)
    #[arg(long, conflicts_with = "no_colors")]
    pub colors: bool,

    /// Disable colors
    #[arg(long = "no-colors")]
    pub no_colors: bool,

    /// Try to show git blame for the row with each error
    #[arg(long)]
    pub blame: bool,

    /// Git executable used for blame
    #[arg(long, value_name = "GIT", default_value = "git")]
    pub git: String,

    /// Read files and directories to check from standard input
    #[arg(long)]
    pub stdin: bool,

    /// Exit successfully even when some files failed to check
    #[arg(long = "ignore-fails")]
    pub ignore_fails: bool,

    /// Also report deprecated constructs as errors
    #[arg(long = "show-deprecated")]
    pub show_deprecated: bool,
}

/// Output renderer choice, fixed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Checkstyle,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.checkstyle {
            OutputFormat::Checkstyle
        } else {
            OutputFormat::Text
        }
    }

    /// Dialect and reporting switches handed to each lint probe.
    pub fn lint_options(&self) -> LintOptions {
        LintOptions {
            short_tag: self.short_tag,
            asp_tags: self.asp_tags,
            show_deprecated: self.show_deprecated,
        }
    }

    /// Color decision: forced on, forced off, or terminal auto-detection.
    pub fn use_colors(&self) -> bool {
        if self.colors {
            true
        } else if self.no_colors {
            false
        } else {
            console::Term::stdout().features().colors_supported()
        }
    }
}
