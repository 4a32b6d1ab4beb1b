// crates/policy-test-core/src/core/result.rs
// ============================================================================
// Module: Policy Test Results
// Description: Suite, test, and case result tree with timing.
// Purpose: Capture every run outcome as queryable data.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Results compose bottom-up: [`CaseResult`] into [`TestResult`] into
//! [`SuiteResult`]. Every list is index-aligned with the input it came from;
//! filtered-out units keep their slot as [`Outcome::Skipped`] so reporters can
//! tell a skipped unit from one that ran and passed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use crate::core::RunError;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Outcome of one test or case.
#[derive(Debug, Default)]
pub enum Outcome {
    /// Unit was filtered out and never ran.
    #[default]
    Skipped,
    /// Unit ran without error.
    Passed,
    /// Unit ran and failed.
    Failed(RunError),
}

impl Outcome {
    /// Builds an outcome from a run result.
    #[must_use]
    pub fn from_result(result: Result<(), RunError>) -> Self {
        match result {
            Ok(()) => Self::Passed,
            Err(err) => Self::Failed(err),
        }
    }

    /// Returns the error when the unit failed.
    #[must_use]
    pub const fn error(&self) -> Option<&RunError> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Skipped | Self::Passed => None,
        }
    }

    /// Returns true when the unit was filtered out.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Passed => "passed",
            Self::Failed(_) => "failed",
        }
    }
}

// ============================================================================
// SECTION: Result Types
// ============================================================================

/// Result of running one suite.
///
/// # Invariants
/// - `test_results.len()` equals the number of tests in the suite.
#[derive(Debug, Default)]
pub struct SuiteResult {
    /// Store-relative path of the suite file.
    pub path: String,
    /// Wall-clock time spent running the suite.
    pub runtime: Duration,
    /// Results index-aligned with the suite's tests.
    pub test_results: Vec<TestResult>,
}

impl SuiteResult {
    /// Returns true when any test or case in the suite failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.test_results.iter().any(TestResult::is_failure)
    }
}

/// Result of running one test.
///
/// # Invariants
/// - `case_results` is empty unless setup succeeded; otherwise it is
///   index-aligned with the test's cases.
/// - [`Outcome::Passed`] means setup succeeded; case failures live in
///   `case_results`.
#[derive(Debug, Default)]
pub struct TestResult {
    /// Test name.
    pub name: String,
    /// Wall-clock time spent on setup and cases.
    pub runtime: Duration,
    /// Setup outcome.
    pub outcome: Outcome,
    /// Results index-aligned with the test's cases.
    pub case_results: Vec<CaseResult>,
}

impl TestResult {
    /// Creates the placeholder for a filtered-out test.
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a result for a test whose setup failed.
    #[must_use]
    pub fn setup_failed(err: RunError) -> Self {
        Self {
            outcome: Outcome::Failed(err),
            ..Self::default()
        }
    }

    /// Returns the setup error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&RunError> {
        self.outcome.error()
    }

    /// Returns true when setup or any case failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.error().is_some() || self.case_results.iter().any(CaseResult::is_failure)
    }
}

/// Result of running one case.
#[derive(Debug, Default)]
pub struct CaseResult {
    /// Case name.
    pub name: String,
    /// Wall-clock time spent on the case.
    pub runtime: Duration,
    /// Case outcome.
    pub outcome: Outcome,
}

impl CaseResult {
    /// Creates the placeholder for a filtered-out case.
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the case error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&RunError> {
        self.outcome.error()
    }

    /// Returns true when the case failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.error().is_some()
    }
}
