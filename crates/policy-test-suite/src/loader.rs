// crates/policy-test-suite/src/loader.rs
// ============================================================================
// Module: Suite Loader
// Description: Suite file decoding and directory discovery.
// Purpose: Turn suite files on disk into ordered, root-relative suites.
// Dependencies: policy-test-core, serde_yaml, walkdir
// ============================================================================

//! ## Overview
//! A suite file is a YAML document whose `kind` and `apiVersion` identify it
//! as a suite. Other YAML files (templates, constraints, objects) commonly
//! live next to suites, so [`read_suite`] returns `Ok(None)` for them rather
//! than an error. Discovery walks a target directory in sorted order so runs
//! are reproducible.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Component;
use std::path::Path;

use policy_test_core::FileStore;
use policy_test_core::SUITE_API_VERSION;
use policy_test_core::SUITE_KIND;
use policy_test_core::StoreError;
use policy_test_core::Suite;
use policy_test_core::clean_path;
use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;
use walkdir::WalkDir;

use crate::store::DirectoryStore;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Suite loading and discovery errors.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Suite file could not be read.
    #[error("reading suite {path}: {source}")]
    Read {
        /// Store path of the suite file.
        path: String,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },
    /// Suite file is not valid YAML or does not match the suite schema.
    #[error("invalid suite {path}: {reason}")]
    InvalidSuite {
        /// Store path of the suite file.
        path: String,
        /// Decoder failure description.
        reason: String,
    },
    /// Explicit target file is not a suite.
    #[error("{path} is not a suite (expected kind Suite and apiVersion test.gatekeeper.sh/v1alpha1)")]
    NotASuite {
        /// Store path of the file.
        path: String,
    },
    /// Directory traversal failed.
    #[error("scanning {path}: {reason}")]
    Walk {
        /// Store path being scanned.
        path: String,
        /// Traversal failure description.
        reason: String,
    },
}

// ============================================================================
// SECTION: Suite Files
// ============================================================================

/// Suite decoded from a file, with its store path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteFile {
    /// Root-relative, slash-separated path of the suite file.
    pub path: String,
    /// Decoded suite.
    pub suite: Suite,
}

/// Reads `path` and decodes it when it is a suite document.
///
/// Only the first YAML document decides whether the file is a suite; any
/// later documents in a suite file must be empty.
///
/// # Errors
///
/// Returns [`SuiteError`] when the file cannot be read, is not valid YAML,
/// or declares itself a suite but does not match the suite schema.
pub fn read_suite<S>(store: &S, path: &str) -> Result<Option<Suite>, SuiteError>
where
    S: FileStore + ?Sized,
{
    let bytes = store.read(path).map_err(|source| SuiteError::Read {
        path: path.to_string(),
        source,
    })?;
    let invalid = |reason: String| SuiteError::InvalidSuite {
        path: path.to_string(),
        reason,
    };

    let mut documents = serde_yaml::Deserializer::from_slice(&bytes);
    let Some(first) = documents.next() else {
        return Ok(None);
    };
    let value = Value::deserialize(first).map_err(|err| invalid(err.to_string()))?;
    if !is_suite_document(&value) {
        return Ok(None);
    }
    for document in documents {
        let trailing = Value::deserialize(document).map_err(|err| invalid(err.to_string()))?;
        if !trailing.is_null() {
            return Err(invalid("suite file must contain a single document".to_string()));
        }
    }
    serde_yaml::from_value(value).map(Some).map_err(|err| invalid(err.to_string()))
}

/// Returns true when the document header identifies a suite.
fn is_suite_document(value: &Value) -> bool {
    let field = |name: &str| value.get(name).and_then(Value::as_str);
    field("kind") == Some(SUITE_KIND) && field("apiVersion") == Some(SUITE_API_VERSION)
}

/// Finds every suite under `target`, a root-relative file or directory.
///
/// A file target must be a suite. A directory target is scanned for
/// `.yaml` and `.yml` files, descending into subdirectories only when
/// `recursive` is set; non-suite files are ignored. Results are sorted by
/// path.
///
/// # Errors
///
/// Returns [`SuiteError`] when the target is missing, escapes the root,
/// cannot be traversed, or contains an unreadable or malformed suite.
pub fn discover_suites(
    store: &DirectoryStore,
    target: &str,
    recursive: bool,
) -> Result<Vec<SuiteFile>, SuiteError> {
    let target = clean_path(target);
    if target.starts_with('/') || target == ".." || target.starts_with("../") {
        return Err(SuiteError::Read {
            path: target.clone(),
            source: StoreError::InvalidPath(target),
        });
    }
    let start = if target == "." { store.root().to_path_buf() } else { store.root().join(&target) };
    if !start.exists() {
        return Err(SuiteError::Read {
            path: target.clone(),
            source: StoreError::NotFound(target),
        });
    }

    if start.is_file() {
        let suite = read_suite(store, &target)?.ok_or_else(|| SuiteError::NotASuite {
            path: target.clone(),
        })?;
        return Ok(vec![SuiteFile {
            path: target,
            suite,
        }]);
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut paths = Vec::new();
    for entry in WalkDir::new(&start).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(|err| SuiteError::Walk {
            path: target.clone(),
            reason: err.to_string(),
        })?;
        if !entry.file_type().is_file() || !is_yaml_file(entry.path()) {
            continue;
        }
        if let Some(relative) = store_relative(store.root(), entry.path()) {
            paths.push(relative);
        }
    }
    paths.sort();

    let mut suites = Vec::new();
    for path in paths {
        if let Some(suite) = read_suite(store, &path)? {
            suites.push(SuiteFile {
                path,
                suite,
            });
        }
    }
    Ok(suites)
}

/// Returns true for `.yaml` and `.yml` files.
fn is_yaml_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml")
}

/// Converts a filesystem path beneath `root` to a slash-separated store path.
fn store_relative(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str()?),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(segments.join("/"))
}
