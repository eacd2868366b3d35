//! The reporter seam.
//!
//! Reporters consume outcome events synchronously and in order. Only
//! `on_suite_end` may escalate, by returning the distinguished
//! suite-failed error; `on_result` records, never raises.

use std::path::Path;

use serde::Serialize;

use crate::errors::TesseraError;
use crate::harness::outcome::{Outcome, OutcomeKind};

/// Aggregate counts over one reporting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub n_ok: usize,
    pub n_skip: usize,
    pub n_warn: usize,
    pub n_fail: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.n_ok + self.n_skip + self.n_warn + self.n_fail
    }

    pub fn is_clean(&self) -> bool {
        self.n_fail == 0
    }

    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Ok => self.n_ok += 1,
            OutcomeKind::Skip => self.n_skip += 1,
            OutcomeKind::Warning => self.n_warn += 1,
            OutcomeKind::Failure | OutcomeKind::Error => self.n_fail += 1,
        }
    }

    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome.kind);
        }
        summary
    }
}

/// Consumer of outcome events plus suite/file lifecycle hooks.
pub trait Reporter {
    fn on_suite_start(&mut self) {}

    fn on_file_start(&mut self, _file: &Path) {}

    fn on_file_end(&mut self, _file: &Path) {}

    /// Called once per outcome, in source order. `context` names the file
    /// being executed; `label` is the test identifier.
    fn on_result(&mut self, context: &str, label: &str, outcome: &Outcome);

    /// Called exactly once after all files (teardown included). Returns
    /// the aggregate summary, or the suite-failed error when the
    /// reporter's policy demands a hard stop.
    fn on_suite_end(&mut self) -> Result<Summary, TesseraError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_partition_outcomes() {
        let mut summary = Summary::default();
        for kind in [
            OutcomeKind::Ok,
            OutcomeKind::Ok,
            OutcomeKind::Skip,
            OutcomeKind::Warning,
            OutcomeKind::Failure,
            OutcomeKind::Error,
        ] {
            summary.record(kind);
        }
        assert_eq!(summary.n_ok, 2);
        assert_eq!(summary.n_skip, 1);
        assert_eq!(summary.n_warn, 1);
        assert_eq!(summary.n_fail, 2);
        assert_eq!(summary.total(), 6);
        assert!(!summary.is_clean());
    }
}
