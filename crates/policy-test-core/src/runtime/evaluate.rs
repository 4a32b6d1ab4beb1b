// crates/policy-test-core/src/runtime/evaluate.rs
// ============================================================================
// Module: Policy Test Case Evaluators
// Description: Allow and deny evaluation of a single example object.
// Purpose: Decide pass or fail for one case against a prepared client.
// Dependencies: crate::{core, interfaces, runtime}, regex
// ============================================================================

//! ## Overview
//! Both evaluators load the object, review it once, and judge the violation
//! list. An allow case passes only with zero violations; a deny case passes
//! with at least one violation and every assertion satisfied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;

use crate::core::Assertion;
use crate::core::AssertionFailure;
use crate::core::RunError;
use crate::interfaces::Client;
use crate::interfaces::FileStore;
use crate::interfaces::RunContext;
use crate::interfaces::Violation;
use crate::runtime::artifacts::read_object;

// ============================================================================
// SECTION: Evaluators
// ============================================================================

/// Evaluates an object expected to be allowed.
///
/// # Errors
///
/// Returns [`RunError::UnexpectedDeny`] carrying the first violation's message
/// when the review reports violations, or the load/review failure.
pub fn evaluate_allow<C, S>(
    ctx: &RunContext,
    client: &C,
    store: &S,
    path: &str,
) -> Result<(), RunError>
where
    C: Client + ?Sized,
    S: FileStore + ?Sized,
{
    let violations = review_object(ctx, client, store, path)?;
    let Some(first) = violations.first() else {
        return Ok(());
    };
    let message = first.msg.clone();
    Err(RunError::UnexpectedDeny {
        message,
        violations,
    })
}

/// Evaluates an object expected to be denied.
///
/// # Errors
///
/// Returns [`RunError::UnexpectedAllow`] when the review reports no
/// violations, [`RunError::AssertionFailed`] when assertions are unmet,
/// [`RunError::InvalidCase`] for malformed assertion patterns, or the
/// load/review failure.
pub fn evaluate_deny<C, S>(
    ctx: &RunContext,
    client: &C,
    store: &S,
    path: &str,
    assertions: &[Assertion],
) -> Result<(), RunError>
where
    C: Client + ?Sized,
    S: FileStore + ?Sized,
{
    let matchers = compile_assertions(assertions)?;
    let violations = review_object(ctx, client, store, path)?;
    if violations.is_empty() {
        return Err(RunError::UnexpectedAllow);
    }
    let failures = check_assertions(&matchers, &violations);
    if failures.is_empty() {
        return Ok(());
    }
    Err(RunError::AssertionFailed {
        failures,
    })
}

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Assertion paired with its compiled message pattern.
struct AssertionMatcher<'a> {
    /// Source assertion.
    assertion: &'a Assertion,
    /// Compiled message pattern.
    pattern: Option<Regex>,
}

/// Compiles assertion message patterns before any client call is made.
fn compile_assertions(assertions: &[Assertion]) -> Result<Vec<AssertionMatcher<'_>>, RunError> {
    assertions
        .iter()
        .enumerate()
        .map(|(index, assertion)| {
            let pattern = match assertion.message.as_deref() {
                Some(message) => Some(Regex::new(message).map_err(|err| {
                    RunError::InvalidCase(format!(
                        "assertion {index} has invalid message pattern: {err}"
                    ))
                })?),
                None => None,
            };
            Ok(AssertionMatcher {
                assertion,
                pattern,
            })
        })
        .collect()
}

/// Returns one failure per assertion the violations do not satisfy.
fn check_assertions(
    matchers: &[AssertionMatcher<'_>],
    violations: &[Violation],
) -> Vec<AssertionFailure> {
    matchers
        .iter()
        .enumerate()
        .filter_map(|(index, matcher)| {
            let matched = violations
                .iter()
                .filter(|violation| {
                    matcher.pattern.as_ref().is_none_or(|pattern| pattern.is_match(&violation.msg))
                })
                .count();
            let expected = matcher.assertion.violations;
            (!expected.is_satisfied_by(matched)).then(|| AssertionFailure {
                index,
                expected,
                matched,
                message: matcher.assertion.message.clone(),
            })
        })
        .collect()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads an object from the store and reviews it.
fn review_object<C, S>(
    ctx: &RunContext,
    client: &C,
    store: &S,
    path: &str,
) -> Result<Vec<Violation>, RunError>
where
    C: Client + ?Sized,
    S: FileStore + ?Sized,
{
    let object = read_object(store, path)?;
    let response = client.review(ctx, &object).map_err(RunError::Review)?;
    Ok(response.violations)
}
