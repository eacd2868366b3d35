//! Suite orchestration.
//!
//! Drives a whole directory of test files: discovery, role ordering
//! (helpers, setup, tests, teardown), filtering of the test role, the
//! shared parent scope, guaranteed teardown, and exactly one
//! `on_suite_end` call whose abort signal becomes this function's own
//! result. The process-wide harness-active flag is held for the duration
//! of the run behind an RAII guard, so it is cleared on every exit path.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::atoms::{canonical_registry, OutputSink};
use crate::errors::TesseraError;
use crate::harness::discovery::{discover, matches_filter, FileRole, TestFile};
use crate::harness::outcome::Outcome;
use crate::harness::reporter::Reporter;
use crate::harness::runner::FileRunner;
use crate::runtime::scope::Scope;

// ============================================================================
// HARNESS-ACTIVE FLAG
// ============================================================================

static ACTIVE: AtomicBool = AtomicBool::new(false);

/// True while a suite is running. Queryable by arbitrary code.
pub fn active() -> bool {
    ACTIVE.load(Ordering::SeqCst)
}

/// Scoped acquisition of the active flag. Acquiring while a run is in
/// progress fails, which makes reentrant suite invocation a no-op.
struct ActiveGuard;

impl ActiveGuard {
    fn acquire() -> Option<Self> {
        ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| ActiveGuard)
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.store(false, Ordering::SeqCst);
    }
}

// ============================================================================
// SUITE OPTIONS
// ============================================================================

/// Policy and tuning for one suite run.
#[derive(Debug, Clone, Default)]
pub struct SuiteOptions {
    /// Matched against test filenames with prefix and extension stripped.
    /// Lifecycle files are never filtered.
    pub filter: Option<String>,
    /// When true, a nonzero failure count turns suite end into the
    /// suite-failed error.
    pub stop_on_failure: bool,
    /// When true, recorded warnings escalate the same way. Evaluated at
    /// suite end, not per event.
    pub stop_on_warning: bool,
    /// Interpreter recursion limit; 0 means the default.
    pub max_depth: usize,
}

impl SuiteOptions {
    pub fn for_package_check() -> Self {
        Self {
            stop_on_failure: true,
            ..Self::default()
        }
    }
}

// ============================================================================
// SUITE EXECUTION
// ============================================================================

/// Run every recognizable file under `dir` and finalize the reporter.
///
/// Returns the aggregated outcome list on success. Returns the
/// suite-failed error when the reporter's `stop_on_failure` policy or
/// this function's `stop_on_warning` policy escalates at suite end; all
/// reporting output has been flushed by then. Reentrant invocation is a
/// no-op returning an empty list.
pub fn run_suite(
    dir: &Path,
    options: &SuiteOptions,
    reporter: &mut dyn Reporter,
    output: &mut dyn OutputSink,
) -> Result<Vec<Outcome>, TesseraError> {
    let Some(_active) = ActiveGuard::acquire() else {
        return Ok(Vec::new());
    };

    let files = discover(dir)?;
    let of_role = |role: FileRole| -> Vec<&TestFile> {
        files.iter().filter(|f| f.role == role).collect()
    };
    let tests: Vec<&TestFile> = of_role(FileRole::Test)
        .into_iter()
        .filter(|f| match &options.filter {
            Some(filter) => matches_filter(f, filter),
            None => true,
        })
        .collect();

    let mut runner = FileRunner::new(canonical_registry());
    if options.max_depth > 0 {
        runner = runner.with_max_depth(options.max_depth);
    }

    reporter.on_suite_start();
    let mut parent = Scope::base();
    let mut outcomes = Vec::new();

    // Lifecycle files evaluate into the shared parent scope, in
    // filename-alphabetical order within each role.
    for file in of_role(FileRole::Helper) {
        outcomes.extend(runner.run_in(&file.path, &mut parent, output, reporter));
    }
    for file in of_role(FileRole::Setup) {
        outcomes.extend(runner.run_in(&file.path, &mut parent, output, reporter));
    }

    for file in &tests {
        reporter.on_file_start(&file.path);
        outcomes.extend(runner.run_isolated(&file.path, &parent, output, reporter));
        reporter.on_file_end(&file.path);
    }

    // Teardown is unconditional: runner-level failures never propagate,
    // so reaching this point does not depend on test success.
    for file in of_role(FileRole::Teardown) {
        outcomes.extend(runner.run_in(&file.path, &mut parent, output, reporter));
    }

    let summary = reporter.on_suite_end()?;
    if options.stop_on_warning && summary.n_warn > 0 {
        return Err(TesseraError::suite_failed(summary.n_fail, summary.n_warn));
    }
    Ok(outcomes)
}
