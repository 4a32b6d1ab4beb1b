// crates/policy-test-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory File Store
// Description: Map-backed file store for suites and artifacts.
// Purpose: Run suites without touching the filesystem.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Files are keyed by their cleaned store path, so `./a/b.yaml` and
//! `a/b.yaml` address the same entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::clean_path;
use crate::interfaces::FileStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory file store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileStore {
    /// File contents keyed by cleaned path.
    files: BTreeMap<String, Vec<u8>>,
}

impl InMemoryFileStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: &str, contents: impl Into<Vec<u8>>) {
        self.files.insert(clean_path(path), contents.into());
    }

    /// Builder-style variant of [`Self::insert`].
    #[must_use]
    pub fn with_file(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Returns the stored paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl FileStore for InMemoryFileStore {
    fn read(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let cleaned = clean_path(path);
        if cleaned.starts_with('/') || cleaned == ".." || cleaned.starts_with("../") {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        self.files.get(&cleaned).cloned().ok_or_else(|| StoreError::NotFound(path.to_string()))
    }
}
