// crates/policy-test-core/src/core/suite.rs
// ============================================================================
// Module: Policy Test Suite Model
// Description: Suite, test, case, and assertion definitions.
// Purpose: Describe which templates, constraints, and objects a run exercises.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Suite`] is an ordered list of [`Test`] values. Each test pairs one
//! template with one constraint and lists example [`Case`] objects that are
//! expected to be allowed or denied. Paths are relative to the directory
//! holding the suite file. The model is immutable during a run and performs
//! no validation of its own; the runner validates the fields it depends on.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Kind expected on suite documents.
pub const SUITE_KIND: &str = "Suite";
/// API version expected on suite documents.
pub const SUITE_API_VERSION: &str = "test.gatekeeper.sh/v1alpha1";

// ============================================================================
// SECTION: Suite Types
// ============================================================================

/// Top-level collection of tests executed together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suite {
    /// Document kind; [`SUITE_KIND`] for suite files.
    #[serde(default)]
    pub kind: String,
    /// Document API version; [`SUITE_API_VERSION`] for suite files.
    #[serde(default)]
    pub api_version: String,
    /// Tests in declared order.
    #[serde(default)]
    pub tests: Vec<Test>,
}

impl Suite {
    /// Creates a suite document with the canonical kind and API version.
    #[must_use]
    pub fn new(tests: Vec<Test>) -> Self {
        Self {
            kind: SUITE_KIND.to_string(),
            api_version: SUITE_API_VERSION.to_string(),
            tests,
        }
    }
}

/// One template and constraint pairing with its example cases.
///
/// # Invariants
/// - `template` and `constraint` must be non-empty for the test to execute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    /// Display name of the test.
    #[serde(default)]
    pub name: String,
    /// Suite-relative path to the template artifact.
    #[serde(default)]
    pub template: String,
    /// Suite-relative path to the constraint artifact.
    #[serde(default)]
    pub constraint: String,
    /// Cases in declared order.
    #[serde(default)]
    pub cases: Vec<Case>,
}

/// One example object and its expected outcome.
///
/// # Invariants
/// - Exactly one of `allow` and `deny` must be set. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// Display name of the case.
    #[serde(default)]
    pub name: String,
    /// Suite-relative path to an object expected to be allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<String>,
    /// Suite-relative path to an object expected to be denied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny: Option<String>,
    /// Expectations about the violations produced for a denied object.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertions: Vec<Assertion>,
}

impl Case {
    /// Creates a case expecting the object at `path` to be allowed.
    #[must_use]
    pub fn allow(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allow: Some(path.into()),
            ..Self::default()
        }
    }

    /// Creates a case expecting the object at `path` to be denied.
    #[must_use]
    pub fn deny(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deny: Some(path.into()),
            ..Self::default()
        }
    }

    /// Returns the expectation when exactly one of `allow` and `deny` is set.
    #[must_use]
    pub fn expectation(&self) -> Option<Expectation<'_>> {
        match (non_empty(self.allow.as_deref()), non_empty(self.deny.as_deref())) {
            (Some(path), None) => Some(Expectation::Allow(path)),
            (None, Some(path)) => Some(Expectation::Deny(path)),
            _ => None,
        }
    }
}

/// Resolved expectation for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation<'a> {
    /// Object at the path must produce no violations.
    Allow(&'a str),
    /// Object at the path must produce at least one violation.
    Deny(&'a str),
}

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Structured expectation about the violations of a denied object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    /// Expected number of matching violations.
    #[serde(default)]
    pub violations: ExpectedViolations,
    /// Optional regular expression violations must match to be counted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Expected count of matching violations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExpectedViolations", into = "RawExpectedViolations")]
pub enum ExpectedViolations {
    /// At least one violation matches.
    #[default]
    Yes,
    /// No violation matches.
    No,
    /// Exactly this many violations match.
    Exactly(usize),
}

impl ExpectedViolations {
    /// Returns true when `matched` satisfies the expectation.
    #[must_use]
    pub const fn is_satisfied_by(self, matched: usize) -> bool {
        match self {
            Self::Yes => matched > 0,
            Self::No => matched == 0,
            Self::Exactly(count) => matched == count,
        }
    }
}

impl fmt::Display for ExpectedViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => f.write_str("at least one"),
            Self::No => f.write_str("none"),
            Self::Exactly(count) => write!(f, "exactly {count}"),
        }
    }
}

/// Wire form of [`ExpectedViolations`] accepted in suite files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawExpectedViolations {
    /// Boolean form (`true` means yes).
    Flag(bool),
    /// Explicit count.
    Count(usize),
    /// Word form (`yes` or `no`).
    Word(String),
}

impl TryFrom<RawExpectedViolations> for ExpectedViolations {
    type Error = String;

    fn try_from(value: RawExpectedViolations) -> Result<Self, Self::Error> {
        match value {
            RawExpectedViolations::Flag(true) => Ok(Self::Yes),
            RawExpectedViolations::Flag(false) => Ok(Self::No),
            RawExpectedViolations::Count(count) => Ok(Self::Exactly(count)),
            RawExpectedViolations::Word(word) => match word.to_ascii_lowercase().as_str() {
                "yes" => Ok(Self::Yes),
                "no" => Ok(Self::No),
                other => Err(format!(
                    "violations must be yes, no, or a non-negative integer, got {other:?}"
                )),
            },
        }
    }
}

impl From<ExpectedViolations> for RawExpectedViolations {
    fn from(value: ExpectedViolations) -> Self {
        match value {
            ExpectedViolations::Yes => Self::Word("yes".to_string()),
            ExpectedViolations::No => Self::Word("no".to_string()),
            ExpectedViolations::Exactly(count) => Self::Count(count),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Treats empty strings as unset.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
