//! parlint CLI entry point

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use parlint::cli::OutputFormat;
use parlint::process::{blame_for_line, git_exists};
use parlint::{
    finder, Cli, CheckstyleOutput, DiagnosticKind, ErrorFormatter, JsonOutput, LintError, Output,
    ParallelLint, PhpExecutable, TextOutput, EXIT_FAILED, EXIT_SUCCESS, EXIT_WITH_ERRORS,
};

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("parlint=warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .try_init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run() -> parlint::Result<ExitCode> {
    let cli = Cli::parse();

    let mut paths = cli.paths.clone();
    if cli.stdin {
        paths.extend(finder::paths_from_stdin()?);
    }
    if paths.is_empty() {
        let _ = Cli::command().print_help();
        return Ok(ExitCode::from(EXIT_FAILED));
    }

    // An unusable interpreter is fatal before anything is scheduled.
    let php = PhpExecutable::resolve(&cli.php)?;

    let files = finder::resolve_files(&paths, &cli.extensions, &cli.excluded)?;
    if files.is_empty() {
        return Err(LintError::NoFilesFound);
    }

    let format = cli.output_format();
    let use_colors = format == OutputFormat::Text && cli.use_colors();
    let translate_tokens = php.needs_token_translation();
    let formatter = ErrorFormatter::new(use_colors, translate_tokens);

    let mut output: Box<dyn Output> = match format {
        OutputFormat::Text => Box::new(TextOutput::new(
            io::stdout(),
            !cli.no_progress,
            use_colors,
        )),
        OutputFormat::Json => Box::new(JsonOutput::new(io::stdout(), translate_tokens)),
        OutputFormat::Checkstyle => Box::new(CheckstyleOutput::new(io::stdout())),
    };

    output.set_total_file_count(files.len());
    output.write_header(&php, cli.parallel_jobs)?;

    let engine = ParallelLint::new(&php, cli.parallel_jobs, cli.lint_options());
    let mut report = engine.lint(files, |status, _file| output.status(status))?;

    if cli.blame && report.has_syntax_error() && git_exists(&cli.git) {
        for diagnostic in report.diagnostics_mut() {
            if diagnostic.kind() != DiagnosticKind::SyntaxError {
                continue;
            }
            let line = match diagnostic.line() {
                Some(line) => line,
                None => continue,
            };
            if let Some(blame) = blame_for_line(&cli.git, diagnostic.file(), line) {
                diagnostic.set_blame(blame);
            }
        }
    }

    output.write_result(&report, &formatter, cli.ignore_fails)?;

    let has_error = if cli.ignore_fails {
        report.has_syntax_error()
    } else {
        report.has_error()
    };

    Ok(ExitCode::from(if has_error {
        EXIT_WITH_ERRORS
    } else {
        EXIT_SUCCESS
    }))
}
