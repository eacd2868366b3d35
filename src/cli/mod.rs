//! The tessera command-line interface.
//!
//! Entry point for all CLI commands; orchestrates the harness and maps
//! the suite-failed signal to a nonzero exit status after all reporting
//! output has been flushed.

use std::path::Path;
use std::process;

use clap::Parser;
use termcolor::{ColorChoice, StandardStream};

use crate::cli::args::{Command, TesseraArgs};
use crate::cli::output::StdoutSink;
use crate::errors::{print_error, ErrorKind, TesseraError};
use crate::harness::check_reporter::CheckReporter;
use crate::harness::discovery::discover;
use crate::harness::orchestrator::{run_suite, SuiteOptions};
use crate::harness::reporter::Summary;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = TesseraArgs::parse();

    let result = match args.command {
        Command::Run {
            path,
            filter,
            stop_on_failure,
            stop_on_warning,
            json,
        } => {
            let options = SuiteOptions {
                filter,
                stop_on_failure,
                stop_on_warning,
                max_depth: 0,
            };
            handle_run(&path, &options, json)
        }
        Command::Check { path, filter } => {
            let options = SuiteOptions {
                filter,
                ..SuiteOptions::for_package_check()
            };
            handle_run(&path.join("tests"), &options, false)
        }
        Command::List { path } => handle_list(&path),
    };

    match result {
        Ok(()) => {}
        Err(e) if e.is_suite_failure() => {
            // Reporting output is already flushed; keep the exit terse.
            eprintln!("{}", e);
            process::exit(1);
        }
        Err(e) => {
            print_error(e);
            process::exit(2);
        }
    }
}

fn handle_run(dir: &Path, options: &SuiteOptions, json: bool) -> Result<(), TesseraError> {
    let choice = if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut reporter = CheckReporter::new(StandardStream::stdout(choice), options.stop_on_failure);
    let mut sink = StdoutSink;
    let outcomes = run_suite(dir, options, &mut reporter, &mut sink)?;

    if json {
        let report = serde_json::json!({
            "summary": Summary::from_outcomes(&outcomes),
            "outcomes": outcomes,
        });
        let rendered = serde_json::to_string_pretty(&report).map_err(|e| {
            TesseraError::harness(ErrorKind::SuiteIo {
                path: dir.display().to_string(),
                message: format!("failed to render JSON report: {}", e),
            })
        })?;
        println!("{}", rendered);
    }
    Ok(())
}

fn handle_list(dir: &Path) -> Result<(), TesseraError> {
    let files = discover(dir)?;
    for file in &files {
        println!("{:<9} {}", file.role.as_str(), file.path.display());
    }
    if files.is_empty() {
        println!("no test files found under {}", dir.display());
    }
    Ok(())
}
