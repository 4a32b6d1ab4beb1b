// crates/policy-test-core/src/runtime/artifacts.rs
// ============================================================================
// Module: Policy Test Artifact Loading
// Description: File-store reads for templates, constraints, and objects.
// Purpose: Turn store paths into decoded, kind-checked artifacts.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Loading failures are returned unchanged to the caller; the runner stores
//! them on the result node as pass-through load errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ArtifactError;
use crate::core::Constraint;
use crate::core::Object;
use crate::core::Template;
use crate::core::parse_object;
use crate::interfaces::FileStore;

// ============================================================================
// SECTION: Loaders
// ============================================================================

/// Reads and decodes the artifact at `path`.
///
/// # Errors
///
/// Returns [`ArtifactError`] when the file is unreadable or not a mapping.
pub fn read_object<S: FileStore + ?Sized>(store: &S, path: &str) -> Result<Object, ArtifactError> {
    let bytes = store.read(path).map_err(|source| ArtifactError::Read {
        path: path.to_string(),
        source,
    })?;
    parse_object(path, &bytes)
}

/// Reads the template at `path`.
///
/// # Errors
///
/// Returns [`ArtifactError`] when the file is unreadable or not a template.
pub fn read_template<S: FileStore + ?Sized>(
    store: &S,
    path: &str,
) -> Result<Template, ArtifactError> {
    Template::from_object(path, read_object(store, path)?)
}

/// Reads the constraint at `path`.
///
/// # Errors
///
/// Returns [`ArtifactError`] when the file is unreadable or not a constraint.
pub fn read_constraint<S: FileStore + ?Sized>(
    store: &S,
    path: &str,
) -> Result<Constraint, ArtifactError> {
    Constraint::from_object(path, read_object(store, path)?)
}
