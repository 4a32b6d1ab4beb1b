// crates/policy-test-core/src/core/object.rs
// ============================================================================
// Module: Policy Test Artifacts
// Description: Unstructured objects, templates, and constraints.
// Purpose: Decode artifact bytes into typed documents handed to clients.
// Dependencies: serde_json, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Artifacts are YAML (or JSON) mappings read from a file store. Every
//! artifact decodes into an [`Object`]; templates and constraints add a kind
//! check on top so clients only ever see documents of the right shape.
//! Decoding is strict: exactly one mapping document per file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Kind carried by template documents.
pub const TEMPLATE_KIND: &str = "ConstraintTemplate";
/// API group carried by constraint documents.
pub const CONSTRAINT_GROUP: &str = "constraints.gatekeeper.sh";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Artifact loading errors.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Artifact bytes could not be read from the file store.
    #[error("reading {path}: {source}")]
    Read {
        /// Store-relative artifact path.
        path: String,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
    /// Artifact bytes are not a single YAML mapping.
    #[error("invalid yaml in {path}: {reason}")]
    InvalidYaml {
        /// Store-relative artifact path.
        path: String,
        /// Decoder diagnostic.
        reason: String,
    },
    /// Artifact is not a template.
    #[error("{path} is not a template: got kind {kind:?}, want \"ConstraintTemplate\"")]
    NotATemplate {
        /// Store-relative artifact path.
        path: String,
        /// Kind found on the document.
        kind: String,
    },
    /// Artifact is not a constraint.
    #[error(
        "{path} is not a constraint: apiVersion must be in group \"constraints.gatekeeper.sh\" and kind must be set"
    )]
    NotAConstraint {
        /// Store-relative artifact path.
        path: String,
    },
}

// ============================================================================
// SECTION: Object
// ============================================================================

/// Unstructured document decoded from an artifact.
///
/// # Invariants
/// - The wrapped value is always a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct Object(Value);

impl Object {
    /// Wraps a JSON value, returning `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        value.is_object().then_some(Self(value))
    }

    /// Returns the document `kind`, or an empty string.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.0.get("kind").and_then(Value::as_str).unwrap_or_default()
    }

    /// Returns the document `apiVersion`, or an empty string.
    #[must_use]
    pub fn api_version(&self) -> &str {
        self.0.get("apiVersion").and_then(Value::as_str).unwrap_or_default()
    }

    /// Returns the API group portion of `apiVersion`.
    #[must_use]
    pub fn group(&self) -> &str {
        self.api_version().rsplit_once('/').map_or("", |(group, _)| group)
    }

    /// Returns `metadata.name`, or an empty string.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0
            .get("metadata")
            .and_then(|meta| meta.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the object and returns the underlying JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Policy schema that constraints instantiate.
#[derive(Debug, Clone, PartialEq)]
pub struct Template(Object);

impl Template {
    /// Validates that `object` is a template.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::NotATemplate`] when the kind does not match.
    pub fn from_object(path: &str, object: Object) -> Result<Self, ArtifactError> {
        if object.kind() != TEMPLATE_KIND {
            return Err(ArtifactError::NotATemplate {
                path: path.to_string(),
                kind: object.kind().to_string(),
            });
        }
        Ok(Self(object))
    }

    /// Returns the template document.
    #[must_use]
    pub const fn object(&self) -> &Object {
        &self.0
    }
}

/// Parameterized policy instance bound to a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint(Object);

impl Constraint {
    /// Validates that `object` is a constraint.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::NotAConstraint`] when the group or kind is wrong.
    pub fn from_object(path: &str, object: Object) -> Result<Self, ArtifactError> {
        if object.group() != CONSTRAINT_GROUP || object.kind().is_empty() {
            return Err(ArtifactError::NotAConstraint {
                path: path.to_string(),
            });
        }
        Ok(Self(object))
    }

    /// Returns the constraint document.
    #[must_use]
    pub const fn object(&self) -> &Object {
        &self.0
    }
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes artifact bytes into an [`Object`].
///
/// # Errors
///
/// Only the first YAML document is decoded; later documents are ignored.
///
/// Returns [`ArtifactError::InvalidYaml`] when the first document is not
/// valid YAML or not a mapping.
pub fn parse_object(path: &str, bytes: &[u8]) -> Result<Object, ArtifactError> {
    let invalid = |reason: String| ArtifactError::InvalidYaml {
        path: path.to_string(),
        reason,
    };
    let Some(document) = serde_yaml::Deserializer::from_slice(bytes).next() else {
        return Err(invalid("document must be a mapping".to_string()));
    };
    let value = Value::deserialize(document).map_err(|err| invalid(err.to_string()))?;
    Object::from_value(value).ok_or_else(|| ArtifactError::InvalidYaml {
        path: path.to_string(),
        reason: "document must be a mapping".to_string(),
    })
}
