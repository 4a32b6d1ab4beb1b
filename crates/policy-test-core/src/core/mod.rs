// crates/policy-test-core/src/core/mod.rs
// ============================================================================
// Module: Policy Test Core Types
// Description: Suite model, artifacts, results, errors, and events.
// Purpose: Provide the data types shared by the runner and its callers.
// Dependencies: serde, serde_json, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what a run consumes (suites and artifacts) and what it
//! produces (the result tree and its events). They carry no execution logic.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod error;
pub mod events;
pub mod object;
pub mod path;
pub mod result;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::AssertionFailure;
pub use error::ErrorKind;
pub use error::RunError;
pub use events::EventError;
pub use events::RunEvent;
pub use events::duration_ms;
pub use object::ArtifactError;
pub use object::CONSTRAINT_GROUP;
pub use object::Constraint;
pub use object::Object;
pub use object::TEMPLATE_KIND;
pub use object::Template;
pub use object::parse_object;
pub use path::clean_path;
pub use path::join_path;
pub use path::parent_dir;
pub use result::CaseResult;
pub use result::Outcome;
pub use result::SuiteResult;
pub use result::TestResult;
pub use suite::Assertion;
pub use suite::Case;
pub use suite::ExpectedViolations;
pub use suite::Expectation;
pub use suite::SUITE_API_VERSION;
pub use suite::SUITE_KIND;
pub use suite::Suite;
pub use suite::Test;
