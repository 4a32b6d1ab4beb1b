// crates/policy-test-suite/tests/report.rs
// ============================================================================
// Module: Report Rendering Tests
// Description: Text layout and summary counting for hand-built result trees.
// Purpose: Ensure every outcome renders in the expected place.
// Dependencies: policy-test-core, policy-test-suite
// ============================================================================
//! ## Overview
//! Builds result trees directly so each outcome combination is covered
//! without running a client.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::time::Duration;

use policy_test_core::CaseResult;
use policy_test_core::Outcome;
use policy_test_core::RunError;
use policy_test_core::SuiteResult;
use policy_test_core::TestResult;
use policy_test_suite::JsonReport;
use policy_test_suite::RunSummary;
use policy_test_suite::Status;
use policy_test_suite::TextReporter;

fn results() -> SuiteResult {
    SuiteResult {
        path: "library/suite.yaml".to_string(),
        runtime: Duration::from_millis(1500),
        test_results: vec![
            TestResult {
                name: "setup".to_string(),
                runtime: Duration::from_millis(250),
                ..TestResult::setup_failed(RunError::InvalidSuite("missing template".to_string()))
            },
            TestResult::skipped("network"),
            TestResult {
                name: "labels".to_string(),
                runtime: Duration::from_millis(40),
                outcome: Outcome::Passed,
                case_results: vec![
                    CaseResult {
                        name: "ok".to_string(),
                        runtime: Duration::from_millis(10),
                        outcome: Outcome::Passed,
                    },
                    CaseResult::skipped("filtered"),
                ],
            },
        ],
    }
}

fn render(verbose: bool, suite: &SuiteResult) -> String {
    let reporter = TextReporter::new(verbose);
    let mut out = Vec::new();
    reporter.write_suite(&mut out, suite).unwrap();
    reporter.write_summary(&mut out, &RunSummary::from_results(std::slice::from_ref(suite))).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn quiet_text_lists_only_failures() {
    let text = render(false, &results());
    assert_eq!(
        text,
        "--- FAIL: setup (0.250s)\n    invalid test suite: missing template\nFAIL\tlibrary/suite.yaml\t1.500s\nFAIL\n"
    );
}

#[test]
fn verbose_text_lists_every_unit() {
    let text = render(true, &results());
    assert_eq!(text.lines().collect::<Vec<_>>(), vec![
        "--- FAIL: setup (0.250s)",
        "    invalid test suite: missing template",
        "--- SKIP: network",
        "--- PASS: labels (0.040s)",
        "    --- PASS: ok (0.010s)",
        "    --- SKIP: filtered",
        "FAIL\tlibrary/suite.yaml\t1.500s",
        "tests: 1 passed, 1 failed, 1 skipped; cases: 1 passed, 0 failed, 1 skipped",
        "FAIL",
    ]);
}

#[test]
fn summary_counts_outcomes() {
    let summary = RunSummary::from_results(&[results(), SuiteResult::default()]);
    assert_eq!(summary.suites, 2);
    assert_eq!(summary.suites_failed, 1);
    assert_eq!((summary.tests_passed, summary.tests_failed, summary.tests_skipped), (1, 1, 1));
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(RunSummary::from_results(&[]).exit_code(), 0);
}

#[test]
fn json_report_mirrors_the_tree() {
    let report = JsonReport::from_results(&[results()]);
    let suite = &report.suites[0];
    assert_eq!(suite.runtime_ms, 1500);
    assert_eq!(suite.status, Status::Failed);
    assert_eq!(suite.tests[0].error.as_ref().map(|err| err.message.as_str()), Some(
        "invalid test suite: missing template"
    ));
    assert_eq!(suite.tests[1].status, Status::Skipped);
    assert_eq!(suite.tests[2].cases[1].status, Status::Skipped);
}
