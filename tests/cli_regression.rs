// CLI regression tests: exit statuses, tally output, discovery listing,
// and the JSON report surface.
// Requires: assert_cmd, predicates, tempfile in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::tempdir;

fn write(dir: &std::path::Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn run_reports_a_clean_tally_and_exits_zero() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "test-basic.tess",
        "(check-equal \"sum\" 3 (+ 1 2)) (check-true \"flag\" true)",
    );

    let mut cmd = Command::cargo_bin("tessera").unwrap();
    cmd.arg("run").arg(dir.path());
    cmd.assert()
        .success()
        .stdout(contains("OK: 2 SKIPPED: 0 WARNINGS: 0 FAILED: 0"));
}

#[test]
fn check_fails_the_process_when_checks_fail() {
    let pkg = tempdir().unwrap();
    let tests = pkg.path().join("tests");
    fs::create_dir(&tests).unwrap();
    write(&tests, "test-sad.tess", "(check-equal \"sum\" 3 4)");

    let mut cmd = Command::cargo_bin("tessera").unwrap();
    cmd.arg("check").arg(pkg.path());
    cmd.assert()
        .failure()
        .code(1)
        .stdout(contains("FAILED: 1").and(contains("1. Failure: sum")));
}

#[test]
fn run_without_stop_flag_exits_zero_despite_failures() {
    let dir = tempdir().unwrap();
    write(dir.path(), "test-sad.tess", "(fail \"nope\")");

    let mut cmd = Command::cargo_bin("tessera").unwrap();
    cmd.arg("run").arg(dir.path());
    cmd.assert().success().stdout(contains("FAILED: 1"));
}

#[test]
fn list_shows_roles_without_running() {
    let dir = tempdir().unwrap();
    write(dir.path(), "helper-util.tess", "(define x 1)");
    write(dir.path(), "test-a.tess", "(check-true \"a\" true)");
    write(dir.path(), "teardown-z.tess", "(print \"bye\")");

    let mut cmd = Command::cargo_bin("tessera").unwrap();
    cmd.arg("list").arg(dir.path());
    cmd.assert()
        .success()
        .stdout(
            contains("helper")
                .and(contains("test-a.tess"))
                .and(contains("teardown")),
        );
}

#[test]
fn json_report_includes_summary_and_outcomes() {
    let dir = tempdir().unwrap();
    write(dir.path(), "test-a.tess", "(check-true \"a\" true)");

    let mut cmd = Command::cargo_bin("tessera").unwrap();
    cmd.arg("run").arg(dir.path()).arg("--json");
    cmd.assert()
        .success()
        .stdout(
            contains("\"n_ok\": 1")
                .and(contains("\"outcomes\""))
                .and(contains("\"kind\": \"ok\"")),
        );
}

#[test]
fn missing_suite_directory_is_a_diagnostic_error() {
    let mut cmd = Command::cargo_bin("tessera").unwrap();
    cmd.arg("run").arg("definitely/not/a/suite");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(contains("not a directory"));
}

#[test]
fn unparseable_file_reports_and_still_summarizes() {
    let dir = tempdir().unwrap();
    write(dir.path(), "test-broken.tess", "(define x 42");

    let mut cmd = Command::cargo_bin("tessera").unwrap();
    cmd.arg("run").arg(dir.path());
    cmd.assert()
        .success()
        .stdout(contains("Error: test-broken.tess").and(contains("FAILED: 1")));
}
