// crates/policy-test-core/src/lib.rs
// ============================================================================
// Module: Policy Test Core Library
// Description: Public API surface for the policy test runner core.
// Purpose: Expose the suite model, result tree, interfaces, and runner.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Policy test core runs declarative admission-policy test suites. A suite
//! pairs templates with constraints and lists example objects expected to be
//! allowed or denied; the runner compiles each pairing on an isolated client
//! and reports pass or fail per example, with timing and typed errors. Policy
//! compilation and evaluation stay behind the [`Client`] interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::Client;
pub use interfaces::ClientError;
pub use interfaces::ClientFactory;
pub use interfaces::ConstraintHandle;
pub use interfaces::FileStore;
pub use interfaces::NoopObserver;
pub use interfaces::ReviewResponse;
pub use interfaces::RunContext;
pub use interfaces::RunObserver;
pub use interfaces::StoreError;
pub use interfaces::TemplateHandle;
pub use interfaces::Violation;
pub use runtime::Filter;
pub use runtime::FilterError;
pub use runtime::InMemoryFileStore;
pub use runtime::JsonLinesObserver;
pub use runtime::MatchAll;
pub use runtime::NameFilter;
pub use runtime::RecordingObserver;
pub use runtime::Runner;
