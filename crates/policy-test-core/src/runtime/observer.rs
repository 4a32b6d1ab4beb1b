// crates/policy-test-core/src/runtime/observer.rs
// ============================================================================
// Module: Policy Test Observers
// Description: JSON-lines and in-memory run event sinks.
// Purpose: Provide structured run logs without a logging framework.
// Dependencies: crate::{core, interfaces}, serde_json
// ============================================================================

//! ## Overview
//! [`JsonLinesObserver`] writes one JSON object per event to any writer.
//! [`RecordingObserver`] keeps events in memory for embedding and tests.
//! Both swallow their own failures: observation never changes a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use crate::core::RunEvent;
use crate::interfaces::RunObserver;

// ============================================================================
// SECTION: JSON Lines Observer
// ============================================================================

/// Observer writing newline-delimited JSON events.
pub struct JsonLinesObserver<W> {
    /// Destination writer.
    writer: Mutex<W>,
}

impl<W: Write> JsonLinesObserver<W> {
    /// Creates an observer writing to `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the observer and returns the writer.
    ///
    /// Returns `None` if a previous write panicked while holding the lock.
    #[must_use]
    pub fn into_inner(self) -> Option<W> {
        self.writer.into_inner().ok()
    }
}

impl<W: Write> RunObserver for JsonLinesObserver<W> {
    fn record(&self, event: &RunEvent) {
        let Ok(mut line) = serde_json::to_vec(event) else {
            return;
        };
        line.push(b'\n');
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(&line).and_then(|()| writer.flush());
        }
    }
}

// ============================================================================
// SECTION: Recording Observer
// ============================================================================

/// Observer that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    /// Events in emission order.
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingObserver {
    /// Creates an empty recording observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl RunObserver for RecordingObserver {
    fn record(&self, event: &RunEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
