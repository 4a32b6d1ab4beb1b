// crates/policy-test-core/src/core/error.rs
// ============================================================================
// Module: Policy Test Errors
// Description: Error taxonomy recorded in suite, test, and case results.
// Purpose: Classify setup, validation, and evaluation failures as data.
// Dependencies: crate::{core, interfaces}, serde, thiserror
// ============================================================================

//! ## Overview
//! Runs never fail as a whole; every failure becomes a [`RunError`] stored on
//! the result node it belongs to. Wrapped variants embed the cause's message
//! so "the client could not be built", "the template was rejected", and "the
//! object escaped enforcement" stay distinguishable in one line of output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::core::ArtifactError;
use crate::core::ExpectedViolations;
use crate::interfaces::ClientError;
use crate::interfaces::Violation;

// ============================================================================
// SECTION: Run Errors
// ============================================================================

/// Failure recorded on a test or case result.
#[derive(Debug, Error)]
pub enum RunError {
    /// Client factory failed.
    #[error("unable to create client: {0}")]
    CreatingClient(#[source] ClientError),
    /// Test is missing a required field.
    #[error("invalid test suite: {0}")]
    InvalidSuite(String),
    /// Case definition is ambiguous or malformed.
    #[error("invalid test case: {0}")]
    InvalidCase(String),
    /// Client rejected the template.
    #[error("adding template: {0}")]
    AddingTemplate(#[source] ClientError),
    /// Client rejected the constraint.
    #[error("adding constraint: {0}")]
    AddingConstraint(#[source] ClientError),
    /// Allow case produced at least one violation.
    #[error("unexpected deny: {message}")]
    UnexpectedDeny {
        /// Message of the first violation.
        message: String,
        /// Every violation reported by the review.
        violations: Vec<Violation>,
    },
    /// Deny case produced no violations.
    #[error("unexpectedly allowed")]
    UnexpectedAllow,
    /// Deny case violations did not satisfy its assertions.
    #[error("{}", AssertionFailures(.failures))]
    AssertionFailed {
        /// One entry per unmet assertion.
        failures: Vec<AssertionFailure>,
    },
    /// Client failed to review an object.
    #[error("reviewing object: {0}")]
    Review(#[source] ClientError),
    /// Artifact could not be loaded.
    #[error(transparent)]
    Load(#[from] ArtifactError),
}

impl RunError {
    /// Returns the stable classification for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CreatingClient(_) => ErrorKind::CreatingClient,
            Self::InvalidSuite(_) => ErrorKind::InvalidSuite,
            Self::InvalidCase(_) => ErrorKind::InvalidCase,
            Self::AddingTemplate(_) => ErrorKind::AddingTemplate,
            Self::AddingConstraint(_) => ErrorKind::AddingConstraint,
            Self::UnexpectedDeny {
                ..
            } => ErrorKind::UnexpectedDeny,
            Self::UnexpectedAllow => ErrorKind::UnexpectedAllow,
            Self::AssertionFailed {
                ..
            } => ErrorKind::AssertionFailed,
            Self::Review(_) => ErrorKind::Review,
            Self::Load(_) => ErrorKind::Load,
        }
    }
}

/// Stable classification of [`RunError`] values.
///
/// # Invariants
/// - Variants and labels are stable for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Client factory failed.
    CreatingClient,
    /// Test is missing a required field.
    InvalidSuite,
    /// Case definition is invalid.
    InvalidCase,
    /// Template registration failed.
    AddingTemplate,
    /// Constraint registration failed.
    AddingConstraint,
    /// Allow case was denied.
    UnexpectedDeny,
    /// Deny case was allowed.
    UnexpectedAllow,
    /// Deny case assertions were not met.
    AssertionFailed,
    /// Review call failed.
    Review,
    /// Artifact load failed.
    Load,
}

impl ErrorKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatingClient => "creating_client",
            Self::InvalidSuite => "invalid_suite",
            Self::InvalidCase => "invalid_case",
            Self::AddingTemplate => "adding_template",
            Self::AddingConstraint => "adding_constraint",
            Self::UnexpectedDeny => "unexpected_deny",
            Self::UnexpectedAllow => "unexpected_allow",
            Self::AssertionFailed => "assertion_failed",
            Self::Review => "review",
            Self::Load => "load",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Assertion Failures
// ============================================================================

/// One unmet assertion of a deny case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionFailure {
    /// Zero-based index of the assertion within the case.
    pub index: usize,
    /// Expected count of matching violations.
    pub expected: ExpectedViolations,
    /// Count of violations that matched.
    pub matched: usize,
    /// Message pattern, when the assertion had one.
    pub message: Option<String>,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "assertion {}: expected {} violation(s)", self.index, self.expected)?;
        if let Some(pattern) = &self.message {
            write!(f, " matching {pattern:?}")?;
        }
        write!(f, ", got {}", self.matched)
    }
}

/// Display adapter joining assertion failures into one line.
struct AssertionFailures<'a>(&'a [AssertionFailure]);

impl fmt::Display for AssertionFailures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("assertion failed")?;
        for (position, failure) in self.0.iter().enumerate() {
            let separator = if position == 0 { ": " } else { "; " };
            write!(f, "{separator}{failure}")?;
        }
        Ok(())
    }
}
