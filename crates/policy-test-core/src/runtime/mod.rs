// crates/policy-test-core/src/runtime/mod.rs
// ============================================================================
// Module: Policy Test Runtime
// Description: Runner, case evaluators, filters, observers, and stores.
// Purpose: Execute suites against pluggable policy clients.
// Dependencies: crate::{core, interfaces}, regex, serde_json
// ============================================================================

//! ## Overview
//! Runtime modules implement suite execution. All callers go through
//! [`Runner`] so ordering, short-circuiting, and isolation stay identical
//! across embeddings.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod artifacts;
pub mod evaluate;
pub mod filter;
pub mod observer;
pub mod runner;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use artifacts::read_constraint;
pub use artifacts::read_object;
pub use artifacts::read_template;
pub use evaluate::evaluate_allow;
pub use evaluate::evaluate_deny;
pub use filter::Filter;
pub use filter::FilterError;
pub use filter::MatchAll;
pub use filter::NameFilter;
pub use observer::JsonLinesObserver;
pub use observer::RecordingObserver;
pub use runner::Runner;
pub use store::InMemoryFileStore;
