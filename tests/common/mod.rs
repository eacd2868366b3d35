//! Shared fixtures for harness integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tessera::harness::{Outcome, Reporter, Summary};
use tessera::TesseraError;

/// Write a suite of named script files into `dir`.
pub fn write_suite(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

/// A reporter that records every event for inspection.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Vec<(String, Outcome)>,
    pub suite_starts: usize,
    pub suite_ends: usize,
    pub files_started: Vec<PathBuf>,
    pub files_ended: Vec<PathBuf>,
}

impl RecordingReporter {
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.events.iter().map(|(_, o)| o.clone()).collect()
    }
}

impl Reporter for RecordingReporter {
    fn on_suite_start(&mut self) {
        self.suite_starts += 1;
    }

    fn on_file_start(&mut self, file: &Path) {
        self.files_started.push(file.to_path_buf());
    }

    fn on_file_end(&mut self, file: &Path) {
        self.files_ended.push(file.to_path_buf());
    }

    fn on_result(&mut self, context: &str, _label: &str, outcome: &Outcome) {
        self.events.push((context.to_string(), outcome.clone()));
    }

    fn on_suite_end(&mut self) -> Result<Summary, TesseraError> {
        self.suite_ends += 1;
        Ok(Summary::from_outcomes(&self.outcomes()))
    }
}
