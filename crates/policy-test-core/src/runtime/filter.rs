// crates/policy-test-core/src/runtime/filter.rs
// ============================================================================
// Module: Policy Test Filters
// Description: Predicates selecting which tests and cases run.
// Purpose: Let callers narrow a run without editing suite files.
// Dependencies: crate::core, regex, thiserror
// ============================================================================

//! ## Overview
//! A [`Filter`] answers two independent questions: should this test run, and
//! should this case run. Excluding a test excludes all of its cases because
//! the runner never reaches them. [`NameFilter`] selects by regular
//! expressions over names using the `TESTS//CASES` syntax.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use thiserror::Error;

use crate::core::Case;
use crate::core::Test;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator between the test and case patterns.
const FILTER_SEPARATOR: &str = "//";

// ============================================================================
// SECTION: Filter Trait
// ============================================================================

/// Side-effect-free selection of tests and cases.
pub trait Filter {
    /// Returns true when the test should run.
    fn matches_test(&self, test: &Test) -> bool;

    /// Returns true when the case should run.
    fn matches_case(&self, case: &Case) -> bool;
}

impl<T: Filter + ?Sized> Filter for &T {
    fn matches_test(&self, test: &Test) -> bool {
        (**self).matches_test(test)
    }

    fn matches_case(&self, case: &Case) -> bool {
        (**self).matches_case(case)
    }
}

/// Filter matching every test and case.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl Filter for MatchAll {
    fn matches_test(&self, _test: &Test) -> bool {
        true
    }

    fn matches_case(&self, _case: &Case) -> bool {
        true
    }
}

// ============================================================================
// SECTION: Name Filter
// ============================================================================

/// Filter parse errors.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Filter has more than one `//` separator.
    #[error("invalid filter {0:?}: at most one \"//\" separator is allowed")]
    TooManySeparators(String),
    /// A filter pattern is not a valid regular expression.
    #[error("invalid filter pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },
}

/// Regex-based filter over test and case names.
///
/// # Invariants
/// - A missing pattern matches everything.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    /// Pattern test names must match.
    test: Option<Regex>,
    /// Pattern case names must match.
    case: Option<Regex>,
}

impl NameFilter {
    /// Parses a `TESTS`, `TESTS//CASES`, or `//CASES` filter expression.
    ///
    /// Empty input and empty parts match everything.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when the expression has several separators or
    /// a pattern fails to compile.
    pub fn parse(run: &str) -> Result<Self, FilterError> {
        let parts: Vec<&str> = run.split(FILTER_SEPARATOR).collect();
        let (test, case) = match parts.as_slice() {
            [test] => (*test, ""),
            [test, case] => (*test, *case),
            _ => return Err(FilterError::TooManySeparators(run.to_string())),
        };
        Ok(Self {
            test: compile(test)?,
            case: compile(case)?,
        })
    }

    /// Returns true when the filter places no restriction.
    #[must_use]
    pub const fn is_match_all(&self) -> bool {
        self.test.is_none() && self.case.is_none()
    }
}

impl Filter for NameFilter {
    fn matches_test(&self, test: &Test) -> bool {
        self.test.as_ref().is_none_or(|pattern| pattern.is_match(&test.name))
    }

    fn matches_case(&self, case: &Case) -> bool {
        self.case.as_ref().is_none_or(|pattern| pattern.is_match(&case.name))
    }
}

/// Compiles a non-empty pattern.
fn compile(pattern: &str) -> Result<Option<Regex>, FilterError> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern).map(Some).map_err(|source| FilterError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
