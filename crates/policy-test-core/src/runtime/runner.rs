// crates/policy-test-core/src/runtime/runner.rs
// ============================================================================
// Module: Policy Test Runner
// Description: Suite, test, and case orchestration with timing.
// Purpose: Sequence client setup and case evaluation into a result tree.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`Runner::run`] walks tests in declared order. Each selected test gets a
//! fresh client from the factory, registers its template and then its
//! constraint, and only then evaluates its selected cases in order. Any
//! setup failure ends that test with an empty case list; siblings are
//! unaffected. The runner never returns an error: every failure is recorded
//! on the result node it belongs to.
//!
//! Execution is sequential. The [`RunContext`] is handed to every client call
//! but never polled here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use crate::core::Case;
use crate::core::CaseResult;
use crate::core::EventError;
use crate::core::Expectation;
use crate::core::Outcome;
use crate::core::RunError;
use crate::core::RunEvent;
use crate::core::Suite;
use crate::core::SuiteResult;
use crate::core::Test;
use crate::core::TestResult;
use crate::core::duration_ms;
use crate::core::join_path;
use crate::core::parent_dir;
use crate::interfaces::Client;
use crate::interfaces::ClientFactory;
use crate::interfaces::FileStore;
use crate::interfaces::NoopObserver;
use crate::interfaces::RunContext;
use crate::interfaces::RunObserver;
use crate::runtime::artifacts::read_constraint;
use crate::runtime::artifacts::read_template;
use crate::runtime::evaluate::evaluate_allow;
use crate::runtime::evaluate::evaluate_deny;
use crate::runtime::filter::Filter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Setup error for tests without a template path.
const MISSING_TEMPLATE: &str = "missing template";
/// Setup error for tests without a constraint path.
const MISSING_CONSTRAINT: &str = "missing constraint";
/// Case error when allow and deny are both set or both unset.
const AMBIGUOUS_CASE: &str = "must define exactly one of allow and deny";

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Executes suites against clients built per test.
///
/// # Invariants
/// - Every executed test uses its own client; clients are dropped when the
///   test ends and never shared.
/// - The runner keeps no reference to results after [`Self::run`] returns.
pub struct Runner<S, F, O = NoopObserver> {
    /// File store holding suites and artifacts.
    store: S,
    /// Factory for per-test clients.
    new_client: F,
    /// Sink for run events.
    observer: O,
}

impl<S, F> Runner<S, F>
where
    S: FileStore,
    F: ClientFactory,
{
    /// Creates a runner reading from `store` and building clients with `new_client`.
    #[must_use]
    pub const fn new(store: S, new_client: F) -> Self {
        Self {
            store,
            new_client,
            observer: NoopObserver,
        }
    }
}

impl<S, F, O> Runner<S, F, O>
where
    S: FileStore,
    F: ClientFactory,
    O: RunObserver,
{
    /// Replaces the event observer.
    #[must_use]
    pub fn with_observer<P: RunObserver>(self, observer: P) -> Runner<S, F, P> {
        Runner {
            store: self.store,
            new_client: self.new_client,
            observer,
        }
    }

    /// Returns the file store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the runner and returns its observer.
    #[must_use]
    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Executes every selected test in `suite` and returns the results.
    ///
    /// `suite_path` is the store path of the suite file; artifact paths are
    /// resolved against its directory.
    pub fn run<Fl>(
        &self,
        ctx: &RunContext,
        filter: &Fl,
        suite_path: &str,
        suite: &Suite,
    ) -> SuiteResult
    where
        Fl: Filter + ?Sized,
    {
        let suite_start = Instant::now();
        self.observer.record(&RunEvent::SuiteStarted {
            path: suite_path.to_string(),
            tests: suite.tests.len(),
        });
        let suite_dir = parent_dir(suite_path);

        let mut test_results = Vec::with_capacity(suite.tests.len());
        for test in &suite.tests {
            if !filter.matches_test(test) {
                self.observer.record(&RunEvent::TestSkipped {
                    test: test.name.clone(),
                });
                test_results.push(TestResult::skipped(test.name.clone()));
                continue;
            }
            self.observer.record(&RunEvent::TestStarted {
                test: test.name.clone(),
            });
            let test_start = Instant::now();
            let mut result = self.run_test(ctx, suite_dir, filter, test);
            result.name.clone_from(&test.name);
            result.runtime = test_start.elapsed();
            self.observer.record(&RunEvent::TestFinished {
                test: test.name.clone(),
                runtime_ms: duration_ms(result.runtime),
                error: EventError::from_outcome(&result.outcome),
            });
            test_results.push(result);
        }

        let result = SuiteResult {
            path: suite_path.to_string(),
            runtime: suite_start.elapsed(),
            test_results,
        };
        self.observer.record(&RunEvent::SuiteFinished {
            path: result.path.clone(),
            runtime_ms: duration_ms(result.runtime),
            failed: result.is_failure(),
        });
        result
    }

    /// Sets up a client for `test` and runs its selected cases.
    fn run_test<Fl>(
        &self,
        ctx: &RunContext,
        suite_dir: &str,
        filter: &Fl,
        test: &Test,
    ) -> TestResult
    where
        Fl: Filter + ?Sized,
    {
        let client = match self.prepare_client(ctx, suite_dir, test) {
            Ok(client) => client,
            Err(err) => return TestResult::setup_failed(err),
        };

        let case_results = test
            .cases
            .iter()
            .map(|case| {
                if filter.matches_case(case) {
                    self.run_case(ctx, &client, suite_dir, &test.name, case)
                } else {
                    self.observer.record(&RunEvent::CaseSkipped {
                        test: test.name.clone(),
                        case: case.name.clone(),
                    });
                    CaseResult::skipped(case.name.clone())
                }
            })
            .collect();
        TestResult {
            outcome: Outcome::Passed,
            case_results,
            ..TestResult::default()
        }
    }

    /// Builds a client and registers the test's template and constraint.
    fn prepare_client(
        &self,
        ctx: &RunContext,
        suite_dir: &str,
        test: &Test,
    ) -> Result<F::Instance, RunError> {
        let mut client = self.new_client.new_client().map_err(RunError::CreatingClient)?;

        if test.template.is_empty() {
            return Err(RunError::InvalidSuite(MISSING_TEMPLATE.to_string()));
        }
        let template = read_template(&self.store, &join_path(suite_dir, &test.template))?;
        Client::add_template(&mut client, ctx, &template).map_err(RunError::AddingTemplate)?;

        if test.constraint.is_empty() {
            return Err(RunError::InvalidSuite(MISSING_CONSTRAINT.to_string()));
        }
        let constraint = read_constraint(&self.store, &join_path(suite_dir, &test.constraint))?;
        Client::add_constraint(&mut client, ctx, &constraint)
            .map_err(RunError::AddingConstraint)?;

        Ok(client)
    }

    /// Evaluates one case against a prepared client.
    fn run_case(
        &self,
        ctx: &RunContext,
        client: &F::Instance,
        suite_dir: &str,
        test_name: &str,
        case: &Case,
    ) -> CaseResult {
        let start = Instant::now();
        let result = match case.expectation() {
            Some(Expectation::Allow(path)) => {
                evaluate_allow(ctx, client, &self.store, &join_path(suite_dir, path))
            }
            Some(Expectation::Deny(path)) => evaluate_deny(
                ctx,
                client,
                &self.store,
                &join_path(suite_dir, path),
                &case.assertions,
            ),
            None => Err(RunError::InvalidCase(AMBIGUOUS_CASE.to_string())),
        };
        let result = CaseResult {
            name: case.name.clone(),
            runtime: start.elapsed(),
            outcome: Outcome::from_result(result),
        };
        self.observer.record(&RunEvent::CaseFinished {
            test: test_name.to_string(),
            case: case.name.clone(),
            runtime_ms: duration_ms(result.runtime),
            error: EventError::from_outcome(&result.outcome),
        });
        result
    }
}
