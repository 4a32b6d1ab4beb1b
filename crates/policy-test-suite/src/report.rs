// crates/policy-test-suite/src/report.rs
// ============================================================================
// Module: Run Reports
// Description: Text and JSON rendering of suite results.
// Purpose: Turn result trees into human and machine readable reports.
// Dependencies: policy-test-config, policy-test-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The text report mirrors `go test` output: failures are always listed,
//! passing and skipped units only in verbose mode, and every suite ends with
//! an `ok` or `FAIL` line. The JSON report is the full result tree with
//! stable status labels and classified errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::time::Duration;

use policy_test_config::OutputConfig;
use policy_test_config::OutputFormat;
use policy_test_core::CaseResult;
use policy_test_core::EventError;
use policy_test_core::Outcome;
use policy_test_core::RunError;
use policy_test_core::SuiteResult;
use policy_test_core::TestResult;
use policy_test_core::duration_ms;
use serde::Serialize;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Reported status of a suite, test, or case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Unit ran and nothing failed.
    Passed,
    /// Unit or one of its children failed.
    Failed,
    /// Unit was filtered out.
    Skipped,
}

impl Status {
    /// Status of a test, counting case failures.
    fn of_test(result: &TestResult) -> Self {
        if result.is_failure() {
            Self::Failed
        } else if result.outcome.is_skipped() {
            Self::Skipped
        } else {
            Self::Passed
        }
    }

    /// Status of a case.
    const fn of_case(result: &CaseResult) -> Self {
        match result.outcome {
            Outcome::Skipped => Self::Skipped,
            Outcome::Passed => Self::Passed,
            Outcome::Failed(_) => Self::Failed,
        }
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Aggregate counts across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Suites executed.
    pub suites: usize,
    /// Suites with at least one failure.
    pub suites_failed: usize,
    /// Tests that ran without failure.
    pub tests_passed: usize,
    /// Tests whose setup or cases failed.
    pub tests_failed: usize,
    /// Tests filtered out.
    pub tests_skipped: usize,
    /// Cases that passed.
    pub cases_passed: usize,
    /// Cases that failed.
    pub cases_failed: usize,
    /// Cases filtered out.
    pub cases_skipped: usize,
}

impl RunSummary {
    /// Counts outcomes across `results`.
    #[must_use]
    pub fn from_results(results: &[SuiteResult]) -> Self {
        let mut summary = Self {
            suites: results.len(),
            ..Self::default()
        };
        for suite in results {
            if suite.is_failure() {
                summary.suites_failed += 1;
            }
            for test in &suite.test_results {
                match Status::of_test(test) {
                    Status::Passed => summary.tests_passed += 1,
                    Status::Failed => summary.tests_failed += 1,
                    Status::Skipped => summary.tests_skipped += 1,
                }
                for case in &test.case_results {
                    match Status::of_case(case) {
                        Status::Passed => summary.cases_passed += 1,
                        Status::Failed => summary.cases_failed += 1,
                        Status::Skipped => summary.cases_skipped += 1,
                    }
                }
            }
        }
        summary
    }

    /// Returns true when nothing failed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.suites_failed == 0
    }

    /// Process exit code for the run: 0 on success, 1 on any failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }
}

// ============================================================================
// SECTION: Text Report
// ============================================================================

/// Writes `go test` style text reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReporter {
    /// List passing and skipped units as well as failures.
    verbose: bool,
}

impl TextReporter {
    /// Creates a reporter.
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self {
            verbose,
        }
    }

    /// Writes the report for one suite.
    ///
    /// # Errors
    ///
    /// Returns an IO error when writing fails.
    pub fn write_suite<W: Write + ?Sized>(&self, out: &mut W, suite: &SuiteResult) -> io::Result<()> {
        for test in &suite.test_results {
            self.write_test(out, test)?;
        }
        let status = if suite.is_failure() { "FAIL" } else { "ok" };
        writeln!(out, "{status}\t{}\t{}s", suite.path, secs(suite.runtime))
    }

    /// Writes the closing `PASS` or `FAIL` line.
    ///
    /// # Errors
    ///
    /// Returns an IO error when writing fails.
    pub fn write_summary<W: Write + ?Sized>(&self, out: &mut W, summary: &RunSummary) -> io::Result<()> {
        if self.verbose {
            writeln!(
                out,
                "tests: {} passed, {} failed, {} skipped; cases: {} passed, {} failed, {} skipped",
                summary.tests_passed,
                summary.tests_failed,
                summary.tests_skipped,
                summary.cases_passed,
                summary.cases_failed,
                summary.cases_skipped,
            )?;
        }
        writeln!(out, "{}", if summary.passed() { "PASS" } else { "FAIL" })
    }

    /// Writes one test and its cases.
    fn write_test<W: Write + ?Sized>(&self, out: &mut W, test: &TestResult) -> io::Result<()> {
        match Status::of_test(test) {
            Status::Failed => {
                writeln!(out, "--- FAIL: {} ({}s)", test.name, secs(test.runtime))?;
                if let Some(err) = test.error() {
                    write_error(out, "    ", err)?;
                }
            }
            Status::Passed if self.verbose => {
                writeln!(out, "--- PASS: {} ({}s)", test.name, secs(test.runtime))?;
            }
            Status::Skipped if self.verbose => writeln!(out, "--- SKIP: {}", test.name)?,
            Status::Passed | Status::Skipped => return Ok(()),
        }
        for case in &test.case_results {
            match Status::of_case(case) {
                Status::Failed => {
                    writeln!(out, "    --- FAIL: {} ({}s)", case.name, secs(case.runtime))?;
                    if let Some(err) = case.error() {
                        write_error(out, "        ", err)?;
                    }
                }
                Status::Passed if self.verbose => {
                    writeln!(out, "    --- PASS: {} ({}s)", case.name, secs(case.runtime))?;
                }
                Status::Skipped if self.verbose => writeln!(out, "    --- SKIP: {}", case.name)?,
                Status::Passed | Status::Skipped => {}
            }
        }
        Ok(())
    }
}

/// Writes an error message with every line indented.
fn write_error<W: Write + ?Sized>(out: &mut W, indent: &str, err: &RunError) -> io::Result<()> {
    for line in err.to_string().lines() {
        writeln!(out, "{indent}{line}")?;
    }
    Ok(())
}

/// Formats a duration as seconds with millisecond precision.
fn secs(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64())
}

// ============================================================================
// SECTION: JSON Report
// ============================================================================

/// Serializable report for a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonReport {
    /// True when nothing failed.
    pub passed: bool,
    /// Aggregate counts.
    pub summary: RunSummary,
    /// Per-suite reports in run order.
    pub suites: Vec<SuiteReport>,
}

/// Serializable report for one suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Suite path.
    pub path: String,
    /// Elapsed milliseconds.
    pub runtime_ms: u64,
    /// Suite status.
    pub status: Status,
    /// Test reports index-aligned with the suite's tests.
    pub tests: Vec<TestReport>,
}

/// Serializable report for one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestReport {
    /// Test name.
    pub name: String,
    /// Elapsed milliseconds.
    pub runtime_ms: u64,
    /// Test status.
    pub status: Status,
    /// Setup failure, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EventError>,
    /// Case reports index-aligned with the test's cases.
    pub cases: Vec<CaseReport>,
}

/// Serializable report for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    /// Case name.
    pub name: String,
    /// Elapsed milliseconds.
    pub runtime_ms: u64,
    /// Case status.
    pub status: Status,
    /// Case failure, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EventError>,
}

impl JsonReport {
    /// Builds the report tree from suite results.
    #[must_use]
    pub fn from_results(results: &[SuiteResult]) -> Self {
        let summary = RunSummary::from_results(results);
        Self {
            passed: summary.passed(),
            summary,
            suites: results.iter().map(SuiteReport::from_result).collect(),
        }
    }

    /// Writes the report as pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an IO error when serialization or writing fails.
    pub fn write<W: Write>(&self, mut out: W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)
    }
}

impl SuiteReport {
    /// Builds a suite report.
    fn from_result(result: &SuiteResult) -> Self {
        Self {
            path: result.path.clone(),
            runtime_ms: duration_ms(result.runtime),
            status: if result.is_failure() { Status::Failed } else { Status::Passed },
            tests: result.test_results.iter().map(TestReport::from_result).collect(),
        }
    }
}

impl TestReport {
    /// Builds a test report.
    fn from_result(result: &TestResult) -> Self {
        Self {
            name: result.name.clone(),
            runtime_ms: duration_ms(result.runtime),
            status: Status::of_test(result),
            error: EventError::from_outcome(&result.outcome),
            cases: result.case_results.iter().map(CaseReport::from_result).collect(),
        }
    }
}

impl CaseReport {
    /// Builds a case report.
    fn from_result(result: &CaseResult) -> Self {
        Self {
            name: result.name.clone(),
            runtime_ms: duration_ms(result.runtime),
            status: Status::of_case(result),
            error: EventError::from_outcome(&result.outcome),
        }
    }
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Writes `results` in the configured format and returns the run summary.
///
/// # Errors
///
/// Returns an IO error when writing fails.
pub fn write_report<W: Write>(
    out: &mut W,
    output: OutputConfig,
    results: &[SuiteResult],
) -> io::Result<RunSummary> {
    let summary = RunSummary::from_results(results);
    match output.format {
        OutputFormat::Text => {
            let reporter = TextReporter::new(output.verbose);
            for suite in results {
                reporter.write_suite(out, suite)?;
            }
            reporter.write_summary(out, &summary)?;
        }
        OutputFormat::Json => JsonReport::from_results(results).write(out)?,
    }
    Ok(summary)
}
