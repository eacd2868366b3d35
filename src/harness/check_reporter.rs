//! Bounded-output reporter.
//!
//! Built for callers that only surface the last ~13 lines of output, the
//! package-check tail budget. Consequences:
//!
//! - failure detail is printed immediately per failure, not collected for
//!   the end, so detail survives even if the run itself is cut short;
//! - the happy path ends with just a rule and a one-line tally;
//! - the end-of-suite failure index is capped at ten lines: with more
//!   than ten failures it shows the first nine and a literal `...`.

use std::io::Write;

use termcolor::{Color, ColorSpec, WriteColor};

use crate::errors::TesseraError;
use crate::harness::outcome::{FailureRecord, Outcome};
use crate::harness::reporter::{Reporter, Summary};

/// Maximum lines the failure index may occupy.
pub const MAX_INDEX_LINES: usize = 10;

const RULE_WIDTH: usize = 64;

pub struct CheckReporter<W: WriteColor> {
    out: W,
    stop_on_failure: bool,
    summary: Summary,
    failures: Vec<FailureRecord>,
}

impl<W: WriteColor> CheckReporter<W> {
    pub fn new(out: W, stop_on_failure: bool) -> Self {
        Self {
            out,
            stop_on_failure,
            summary: Summary::default(),
            failures: Vec::new(),
        }
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self) {
        let _ = writeln!(self.out, "{}", "-".repeat(RULE_WIDTH));
    }

    /// Header padded with dashes to the rule width; the header's trailing
    /// space separates it from the fill.
    fn emit_failure_block(&mut self, outcome: &Outcome) {
        let header = outcome.failure_header();
        let fill = RULE_WIDTH.saturating_sub(header.len());
        let _ = self
            .out
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        let _ = write!(self.out, "{}", header);
        let _ = self.out.reset();
        let _ = writeln!(self.out, "{}", "-".repeat(fill));
        if !outcome.message.is_empty() {
            let _ = writeln!(self.out, "{}", outcome.message);
        }
        if let Some(detail) = &outcome.detail {
            let _ = writeln!(self.out, "{}", detail);
        }
        let _ = writeln!(self.out);
    }

    fn emit_tally(&mut self) {
        let failed_color = if self.summary.n_fail > 0 {
            Color::Red
        } else {
            Color::Green
        };
        let _ = write!(
            self.out,
            "OK: {} SKIPPED: {} WARNINGS: {} ",
            self.summary.n_ok, self.summary.n_skip, self.summary.n_warn
        );
        let _ = self
            .out
            .set_color(ColorSpec::new().set_fg(Some(failed_color)).set_bold(true));
        let _ = write!(self.out, "FAILED: {}", self.summary.n_fail);
        let _ = self.out.reset();
        let _ = writeln!(self.out);
    }

    /// Condensed index of failures, capped so it always fits the tail
    /// budget: nine entries plus `...` when there are more than ten.
    fn emit_failure_index(&mut self) {
        let truncated = self.failures.len() > MAX_INDEX_LINES;
        let shown = if truncated {
            MAX_INDEX_LINES - 1
        } else {
            self.failures.len()
        };
        let width = shown.to_string().len();
        let lines: Vec<String> = self
            .failures
            .iter()
            .take(shown)
            .enumerate()
            .map(|(i, record)| {
                format!("{:>width$}. {}", i + 1, record.outcome.failure_header())
            })
            .collect();
        for line in lines {
            let _ = writeln!(self.out, "{}", line);
        }
        if truncated {
            let _ = writeln!(self.out, "...");
        }
    }
}

impl<W: WriteColor> Reporter for CheckReporter<W> {
    fn on_result(&mut self, context: &str, _label: &str, outcome: &Outcome) {
        self.summary.record(outcome.kind);
        if !outcome.kind.is_failing() {
            // ok/skip/warning are counted but never detailed, keeping the
            // tail budget for failures
            return;
        }
        self.failures.push(FailureRecord {
            context: context.to_string(),
            outcome: outcome.clone(),
        });
        self.emit_failure_block(outcome);
    }

    fn on_suite_end(&mut self) -> Result<Summary, TesseraError> {
        self.rule();
        self.emit_tally();
        if self.summary.n_fail > 0 {
            self.emit_failure_index();
        }
        let _ = self.out.flush();
        if self.stop_on_failure && self.summary.n_fail > 0 {
            return Err(TesseraError::suite_failed(
                self.summary.n_fail,
                self.summary.n_warn,
            ));
        }
        Ok(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::outcome::{OutcomeKind, SourceRef};
    use termcolor::NoColor;

    fn outcome(kind: OutcomeKind, label: &str) -> Outcome {
        Outcome {
            kind,
            label: label.to_string(),
            location: Some(SourceRef {
                file: "test-sample.tess".into(),
                line: 1,
            }),
            message: "expected 1, got 2".into(),
            detail: None,
        }
    }

    fn reporter(stop_on_failure: bool) -> CheckReporter<NoColor<Vec<u8>>> {
        CheckReporter::new(NoColor::new(Vec::new()), stop_on_failure)
    }

    fn rendered(reporter: CheckReporter<NoColor<Vec<u8>>>) -> String {
        String::from_utf8(reporter.into_inner().into_inner()).unwrap()
    }

    #[test]
    fn clean_suite_is_rule_and_tally_only() {
        let mut r = reporter(true);
        for _ in 0..5 {
            r.on_result("f", "t", &outcome(OutcomeKind::Ok, "t"));
        }
        r.on_result("f", "s", &outcome(OutcomeKind::Skip, "s"));
        let summary = r.on_suite_end().unwrap();
        assert_eq!(summary.total(), 6);
        let text = rendered(r);
        assert!(text.contains("OK: 5 SKIPPED: 1 WARNINGS: 0 FAILED: 0"));
        // no index, no failure headers
        assert!(!text.contains("Failure:"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn failures_abort_when_stopping_is_requested() {
        let mut r = reporter(true);
        for _ in 0..3 {
            r.on_result("f", "t", &outcome(OutcomeKind::Ok, "t"));
        }
        r.on_result("f", "a", &outcome(OutcomeKind::Failure, "a"));
        r.on_result("f", "b", &outcome(OutcomeKind::Failure, "b"));
        let err = r.on_suite_end().unwrap_err();
        assert!(err.is_suite_failure());
        let text = rendered(r);
        assert!(text.contains("FAILED: 2"));
        assert!(text.contains("1. Failure: a"));
        assert!(text.contains("2. Failure: b"));
    }

    #[test]
    fn failures_do_not_abort_without_the_policy() {
        let mut r = reporter(false);
        r.on_result("f", "a", &outcome(OutcomeKind::Failure, "a"));
        let summary = r.on_suite_end().unwrap();
        assert_eq!(summary.n_fail, 1);
    }

    #[test]
    fn many_failures_truncate_to_nine_plus_ellipsis() {
        let mut r = reporter(false);
        for i in 0..15 {
            r.on_result("f", "t", &outcome(OutcomeKind::Failure, &format!("t{}", i)));
        }
        let _ = r.on_suite_end().unwrap();
        let text = rendered(r);
        let index_lines: Vec<&str> = text
            .lines()
            .filter(|l| {
                let t = l.trim_start();
                t.starts_with(|c: char| c.is_ascii_digit()) || *l == "..."
            })
            .collect();
        assert_eq!(index_lines.len(), MAX_INDEX_LINES);
        assert_eq!(*index_lines.last().unwrap(), "...");
        assert!(text.contains("9. Failure: t8"));
        assert!(!text.contains("10. Failure"));
    }

    #[test]
    fn exactly_ten_failures_show_all_with_aligned_ordinals() {
        let mut r = reporter(false);
        for i in 0..10 {
            r.on_result("f", "t", &outcome(OutcomeKind::Failure, &format!("t{}", i)));
        }
        let _ = r.on_suite_end().unwrap();
        let text = rendered(r);
        assert!(text.contains(" 1. Failure: t0"));
        assert!(text.contains("10. Failure: t9"));
        assert!(!text.contains("..."));
    }

    #[test]
    fn error_outcomes_use_the_error_header() {
        let mut r = reporter(false);
        r.on_result("f", "e", &outcome(OutcomeKind::Error, "e"));
        let _ = r.on_suite_end().unwrap();
        let text = rendered(r);
        assert!(text.contains("Error: e (@test-sample.tess#1)"));
    }

    #[test]
    fn detail_blocks_print_immediately_per_failure() {
        let mut r = reporter(false);
        let mut o = outcome(OutcomeKind::Failure, "diffy");
        o.detail = Some("- 1\n+ 2".into());
        r.on_result("f", "diffy", &o);
        // before suite end, the block is already on the sink
        let text = String::from_utf8(r.out.get_ref().clone()).unwrap();
        assert!(text.contains("Failure: diffy"));
        assert!(text.contains("- 1"));
        assert!(text.contains("+ 2"));
    }
}
