// crates/policy-test-suite/src/lib.rs
// ============================================================================
// Module: Policy Test Suite Library
// Description: Filesystem suites, discovery, verification, and reporting.
// Purpose: Run policy test suites from disk under a validated configuration.
// Dependencies: policy-test-config, policy-test-core, serde_yaml, walkdir
// ============================================================================

//! ## Overview
//! This crate connects the runner core to the filesystem. A
//! [`DirectoryStore`] confines reads to the suite root, [`discover_suites`]
//! finds suite files, a [`Verifier`] runs them under one configuration, and
//! [`TextReporter`] or [`JsonReport`] render the results.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod loader;
pub mod report;
pub mod store;
pub mod verify;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use loader::SuiteError;
pub use loader::SuiteFile;
pub use loader::discover_suites;
pub use loader::read_suite;
pub use report::CaseReport;
pub use report::JsonReport;
pub use report::RunSummary;
pub use report::Status;
pub use report::SuiteReport;
pub use report::TestReport;
pub use report::TextReporter;
pub use report::write_report;
pub use store::DirectoryStore;
pub use verify::VerifyError;
pub use verify::Verifier;
