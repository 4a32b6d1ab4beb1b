// crates/policy-test-core/src/interfaces/mod.rs
// ============================================================================
// Module: Policy Test Interfaces
// Description: Backend-agnostic interfaces for files, clients, and observers.
// Purpose: Define the contract surfaces consumed by the policy test runner.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! The runner never compiles or evaluates policy itself. It reads artifacts
//! through a [`FileStore`], drives a [`Client`] built by a [`ClientFactory`]
//! for every test, and reports progress to a [`RunObserver`]. Any conforming
//! implementation (in-process compiler, remote service, stub) can be plugged
//! in without the runner depending on its internals.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::Constraint;
use crate::core::Object;
use crate::core::RunEvent;
use crate::core::Template;

// ============================================================================
// SECTION: File Store
// ============================================================================

/// File store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No file exists at the path.
    #[error("file not found: {0}")]
    NotFound(String),
    /// Path is malformed or escapes the store root.
    #[error("invalid path: {0}")]
    InvalidPath(String),
    /// File exceeds the configured size limit.
    #[error("file exceeds size limit: {0}")]
    TooLarge(String),
    /// File could not be read.
    #[error("file store io error: {0}")]
    Io(String),
}

/// Read-only hierarchical file store addressed by slash-separated paths.
pub trait FileStore {
    /// Reads the file at a store-relative path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file is missing or unreadable.
    fn read(&self, path: &str) -> Result<Vec<u8>, StoreError>;
}

impl<T: FileStore + ?Sized> FileStore for &T {
    fn read(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        (**self).read(path)
    }
}

// ============================================================================
// SECTION: Run Context
// ============================================================================

/// Cancellation signal threaded through every client call.
///
/// # Invariants
/// - Clones share the same cancel flag.
/// - The runner never polls the context; clients decide when to honor it.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Shared cancel flag.
    cancelled: Arc<AtomicBool>,
    /// Optional point in time after which the run counts as cancelled.
    deadline: Option<Instant>,
}

impl RunContext {
    /// Creates a context that is never cancelled unless [`Self::cancel`] is called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this context that also expires after `timeout`.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Signals cancellation to every clone of this context.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns the deadline, if one was set.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true once cancelled or past the deadline.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Client errors reported by policy engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Client rejected the request or failed internally.
    #[error("{0}")]
    Failed(String),
    /// Client observed a cancelled [`RunContext`].
    #[error("operation cancelled")]
    Cancelled,
}

/// Handle returned after registering a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateHandle {
    /// Constraint kind defined by the template.
    pub kind: String,
}

/// Handle returned after registering a constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintHandle {
    /// Constraint kind.
    pub kind: String,
    /// Constraint name.
    pub name: String,
}

/// Single policy-compliance failure produced by a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Human-readable diagnostic message.
    pub msg: String,
    /// Name of the constraint that produced the violation, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
}

impl Violation {
    /// Creates a violation with only a message.
    #[must_use]
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            constraint: None,
        }
    }
}

/// Result of reviewing one object.
///
/// # Invariants
/// - An empty violation list means the object is compliant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResponse {
    /// Violations in the order the client reported them.
    pub violations: Vec<Violation>,
}

impl ReviewResponse {
    /// Creates a response from a violation list.
    #[must_use]
    pub const fn new(violations: Vec<Violation>) -> Self {
        Self {
            violations,
        }
    }

    /// Returns the violations in reported order.
    #[must_use]
    pub fn results(&self) -> &[Violation] {
        &self.violations
    }
}

/// Policy engine capability: compile templates and constraints, review objects.
///
/// Registrations are scoped to one client instance; a review evaluates the
/// object against every constraint registered on that instance.
pub trait Client {
    /// Registers a template.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the template does not compile.
    fn add_template(
        &mut self,
        ctx: &RunContext,
        template: &Template,
    ) -> Result<TemplateHandle, ClientError>;

    /// Registers a constraint bound to a previously added template.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the template is unknown or the constraint
    /// is malformed.
    fn add_constraint(
        &mut self,
        ctx: &RunContext,
        constraint: &Constraint,
    ) -> Result<ConstraintHandle, ClientError>;

    /// Reviews an object against every registered constraint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when evaluation fails.
    fn review(&self, ctx: &RunContext, object: &Object) -> Result<ReviewResponse, ClientError>;
}

/// Zero-argument constructor for fresh, isolated clients.
pub trait ClientFactory {
    /// Client type produced by the factory.
    type Instance: Client;

    /// Builds a new client with no registered templates or constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the client cannot be constructed.
    fn new_client(&self) -> Result<Self::Instance, ClientError>;
}

impl<F, C> ClientFactory for F
where
    F: Fn() -> Result<C, ClientError>,
    C: Client,
{
    type Instance = C;

    fn new_client(&self) -> Result<C, ClientError> {
        self()
    }
}

// ============================================================================
// SECTION: Observer
// ============================================================================

/// Sink for structured run events.
///
/// Observers are purely observational and must not influence control flow.
pub trait RunObserver {
    /// Records a run event.
    fn record(&self, event: &RunEvent);
}

impl<T: RunObserver + ?Sized> RunObserver for &T {
    fn record(&self, event: &RunEvent) {
        (**self).record(event);
    }
}

/// No-op observer.
///
/// # Invariants
/// - Events are intentionally discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn record(&self, _event: &RunEvent) {}
}
