//! Command-line arguments and subcommands for the tessera CLI.
//!
//! Uses `clap` with the derive feature for a declarative, type-safe
//! argument structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "tessera",
    version,
    about = "A unit-test runner and reporter for script packages."
)]
pub struct TesseraArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run all test scripts in a directory.
    Run {
        /// The directory containing test scripts.
        #[arg(default_value = "tests")]
        path: PathBuf,
        /// Only run test files whose stripped name contains this pattern.
        #[arg(long)]
        filter: Option<String>,
        /// Exit nonzero when any check fails.
        #[arg(long)]
        stop_on_failure: bool,
        /// Treat recorded warnings as fatal at suite end.
        #[arg(long)]
        stop_on_warning: bool,
        /// Print a machine-readable JSON summary after the run.
        #[arg(long)]
        json: bool,
    },
    /// Run a package's suite (its tests/ directory), failing on failures.
    Check {
        /// The package root directory.
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Only run test files whose stripped name contains this pattern.
        #[arg(long)]
        filter: Option<String>,
    },
    /// List discovered test files and their roles without running them.
    List {
        /// The directory containing test scripts.
        #[arg(default_value = "tests")]
        path: PathBuf,
    },
}
