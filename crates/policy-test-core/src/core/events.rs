// crates/policy-test-core/src/core/events.rs
// ============================================================================
// Module: Policy Test Run Events
// Description: Structured events emitted while a suite runs.
// Purpose: Give observers a stable, serializable view of run progress.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Events mirror the suite, test, and case lifecycle. They carry names,
//! runtimes, and error classifications but never artifact contents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;

use crate::core::ErrorKind;
use crate::core::Outcome;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Lifecycle event emitted by the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    /// Suite execution began.
    SuiteStarted {
        /// Suite path.
        path: String,
        /// Number of tests declared.
        tests: usize,
    },
    /// Test was filtered out.
    TestSkipped {
        /// Test name.
        test: String,
    },
    /// Test execution began.
    TestStarted {
        /// Test name.
        test: String,
    },
    /// Test execution ended.
    TestFinished {
        /// Test name.
        test: String,
        /// Elapsed milliseconds.
        runtime_ms: u64,
        /// Setup failure, when present.
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<EventError>,
    },
    /// Case was filtered out.
    CaseSkipped {
        /// Parent test name.
        test: String,
        /// Case name.
        case: String,
    },
    /// Case execution ended.
    CaseFinished {
        /// Parent test name.
        test: String,
        /// Case name.
        case: String,
        /// Elapsed milliseconds.
        runtime_ms: u64,
        /// Case failure, when present.
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<EventError>,
    },
    /// Suite execution ended.
    SuiteFinished {
        /// Suite path.
        path: String,
        /// Elapsed milliseconds.
        runtime_ms: u64,
        /// Whether anything in the suite failed.
        failed: bool,
    },
}

/// Error summary attached to finished events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventError {
    /// Error classification.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
}

impl EventError {
    /// Summarizes the error of a failed outcome.
    #[must_use]
    pub fn from_outcome(outcome: &Outcome) -> Option<Self> {
        outcome.error().map(|err| Self {
            kind: err.kind(),
            message: err.to_string(),
        })
    }
}

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
#[must_use]
pub fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
