// crates/policy-test-suite/tests/verify.rs
// ============================================================================
// Module: Verification Tests
// Description: Config-driven runs over on-disk suites with report rendering.
// Purpose: Ensure suites run end to end and reports reflect their results.
// Dependencies: policy-test-config, policy-test-core, policy-test-suite, serde_json, tempfile
// ============================================================================
//! ## Overview
//! Runs the required-labels fixture through a [`Verifier`] backed by a
//! label-checking stub client and inspects the text and JSON reports.

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

mod common;

use std::path::Path;
use std::time::Duration;

use common::UNLABELED_YAML;
use common::label_factory;
use common::labels_root;
use common::write_file;
use common::write_labels_suite;
use policy_test_config::OutputConfig;
use policy_test_config::OutputFormat;
use policy_test_config::VerifyConfig;
use policy_test_core::ErrorKind;
use policy_test_core::RecordingObserver;
use policy_test_core::RunEvent;
use policy_test_suite::RunSummary;
use policy_test_suite::Verifier;
use policy_test_suite::VerifyError;
use policy_test_suite::write_report;
use serde_json::Value;

fn config(root: &Path) -> VerifyConfig {
    let mut config = VerifyConfig::default();
    config.suites.root = root.to_path_buf();
    config.suites.recursive = true;
    config
}

fn render(output: OutputConfig, results: &[policy_test_core::SuiteResult]) -> (String, RunSummary) {
    let mut out = Vec::new();
    let summary = write_report(&mut out, output, results).unwrap();
    (String::from_utf8(out).unwrap(), summary)
}

#[test]
fn passing_suite_reports_ok() {
    let root = labels_root();
    let verifier = Verifier::new(config(root.path()), label_factory).unwrap();

    let results = verifier.verify().unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, "policies/labels/suite.yaml");
    assert!(!results[0].is_failure());
    let (text, summary) = render(OutputConfig::default(), &results);
    assert!(text.starts_with("ok\tpolicies/labels/suite.yaml\t"), "{text}");
    assert!(text.ends_with("PASS\n"), "{text}");
    assert!(!text.contains("--- "), "{text}");
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(summary.cases_passed, 2);
}

#[test]
fn failing_case_is_reported_with_error() {
    let root = labels_root();
    write_file(root.path(), "policies/labels/labeled.yaml", UNLABELED_YAML);
    let verifier = Verifier::new(config(root.path()), label_factory).unwrap();

    let results = verifier.verify().unwrap();
    let (text, summary) = render(OutputConfig::default(), &results);

    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("--- FAIL: required-labels ("), "{text}");
    assert!(lines[1].starts_with("    --- FAIL: labeled-namespace ("), "{text}");
    assert_eq!(lines[2], "        unexpected deny: you must provide labels: {\"owner\"}");
    assert!(lines[3].starts_with("FAIL\tpolicies/labels/suite.yaml\t"), "{text}");
    assert_eq!(lines[4], "FAIL");
    assert_eq!(summary.tests_failed, 1);
    assert_eq!(summary.cases_failed, 1);
    assert_eq!(summary.cases_passed, 1);
    assert_eq!(summary.exit_code(), 1);
}

#[test]
fn verbose_text_lists_passing_and_skipped_units() {
    let root = labels_root();
    let mut config = config(root.path());
    config.run.filter = "//unlabeled".to_string();
    config.output.verbose = true;
    let verifier = Verifier::new(config.clone(), label_factory).unwrap();

    let results = verifier.verify().unwrap();
    let (text, summary) = render(config.output, &results);

    assert!(text.contains("--- PASS: required-labels ("), "{text}");
    assert!(text.contains("    --- SKIP: labeled-namespace\n"), "{text}");
    assert!(text.contains("    --- PASS: unlabeled-namespace ("), "{text}");
    assert!(text.contains("tests: 1 passed, 0 failed, 0 skipped; cases: 1 passed, 0 failed, 1 skipped"));
    assert_eq!(summary.cases_skipped, 1);
}

#[test]
fn json_report_carries_statuses_and_error_kinds() {
    let root = labels_root();
    write_labels_suite(root.path(), "policies/broken");
    write_file(
        root.path(),
        "policies/broken/constraint.yaml",
        "apiVersion: constraints.gatekeeper.sh/v1beta1\nkind: K8sUnknown\nmetadata:\n  name: x\n",
    );
    let verifier = Verifier::new(config(root.path()), label_factory).unwrap();
    let results = verifier.verify().unwrap();

    let output = OutputConfig {
        format: OutputFormat::Json,
        verbose: false,
    };
    let (text, summary) = render(output, &results);
    let report: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(report["passed"], false);
    assert_eq!(report["summary"]["suites_failed"], 1);
    assert_eq!(report["suites"][0]["path"], "policies/broken/suite.yaml");
    assert_eq!(report["suites"][0]["status"], "failed");
    let test = &report["suites"][0]["tests"][0];
    assert_eq!(test["status"], "failed");
    assert_eq!(test["error"]["kind"], "adding_constraint");
    assert_eq!(test["cases"], Value::Array(Vec::new()));
    assert_eq!(report["suites"][1]["status"], "passed");
    assert!(report["suites"][1]["tests"][0]["cases"][0].get("error").is_none());
    assert_eq!(summary.exit_code(), 1);
}

#[test]
fn observer_sees_every_suite() {
    let root = labels_root();
    write_labels_suite(root.path(), "policies/copy");
    let observer = RecordingObserver::new();
    let verifier =
        Verifier::new(config(root.path()), label_factory).unwrap().with_observer(&observer);

    verifier.verify().unwrap();

    let started: Vec<String> = observer
        .events()
        .into_iter()
        .filter_map(|event| match event {
            RunEvent::SuiteStarted { path, .. } => Some(path),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec!["policies/copy/suite.yaml", "policies/labels/suite.yaml"]);
}

#[test]
fn timeout_is_applied_to_the_run_context() {
    let root = labels_root();
    let mut config = config(root.path());
    config.run.timeout_ms = Some(60_000);
    let verifier = Verifier::new(config, label_factory).unwrap();

    assert!(verifier.context().deadline().is_some());
    assert!(!verifier.context().is_cancelled());
}

#[test]
fn cancelled_context_surfaces_as_review_errors() {
    let root = labels_root();
    let verifier = Verifier::new(config(root.path()), label_factory).unwrap();
    let ctx = verifier.context().with_timeout(Duration::ZERO);

    let results = verifier.verify_with(&ctx).unwrap();

    let case = &results[0].test_results[0].case_results[0];
    assert_eq!(case.error().map(policy_test_core::RunError::kind), Some(ErrorKind::Review));
}

#[test]
fn setup_errors_are_verify_errors() {
    let root = labels_root();

    let mut bad_filter = config(root.path());
    bad_filter.run.filter = "(".to_string();
    assert!(matches!(Verifier::new(bad_filter, label_factory), Err(VerifyError::Filter(_))));

    let mut bad_root = config(root.path());
    bad_root.suites.root = root.path().join("missing");
    assert!(matches!(Verifier::new(bad_root, label_factory), Err(VerifyError::Root(_))));

    let mut bad_limit = config(root.path());
    bad_limit.limits.max_file_bytes = 0;
    assert!(matches!(Verifier::new(bad_limit, label_factory), Err(VerifyError::Config(_))));

    let mut bad_target = config(root.path());
    bad_target.suites.target = "policies/absent".to_string();
    let verifier = Verifier::new(bad_target, label_factory).unwrap();
    assert!(matches!(verifier.verify(), Err(VerifyError::Suite(_))));
}
