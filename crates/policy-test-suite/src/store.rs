// crates/policy-test-suite/src/store.rs
// ============================================================================
// Module: Directory File Store
// Description: Filesystem-backed file store rooted at a directory.
// Purpose: Serve suite and artifact files with root confinement and size limits.
// Dependencies: policy-test-core
// ============================================================================

//! ## Overview
//! [`DirectoryStore`] resolves slash-separated store paths beneath a
//! canonical root directory. Paths that escape the root, either lexically or
//! through symlinks, are rejected as [`StoreError::InvalidPath`]. Reads are
//! bounded by a hard byte limit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use policy_test_core::FileStore;
use policy_test_core::StoreError;
use policy_test_core::clean_path;

// ============================================================================
// SECTION: Directory Store
// ============================================================================

/// File store backed by a directory on disk.
///
/// # Invariants
/// - `root` is canonical; every resolved file lies beneath it.
/// - No read returns more than `max_bytes` bytes.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    /// Canonical root directory.
    root: PathBuf,
    /// Maximum file size in bytes.
    max_bytes: usize,
}

impl DirectoryStore {
    /// Opens a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the root does not exist or is not a directory.
    pub fn open(root: &Path, max_bytes: usize) -> Result<Self, StoreError> {
        let display = root.display().to_string();
        let root = fs::canonicalize(root).map_err(|err| map_io_error(&display, &err))?;
        if !root.is_dir() {
            return Err(StoreError::InvalidPath(format!("{display} is not a directory")));
        }
        Ok(Self {
            root,
            max_bytes,
        })
    }

    /// Returns the canonical root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the per-file size limit.
    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Resolves a store path to a canonical filesystem path beneath the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let cleaned = clean_path(path);
        if cleaned.starts_with('/') || cleaned == ".." || cleaned.starts_with("../") {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        let mut full = self.root.clone();
        for segment in cleaned.split('/').filter(|segment| *segment != ".") {
            if segment.contains('\\') || segment.contains('\0') {
                return Err(StoreError::InvalidPath(path.to_string()));
            }
            full.push(segment);
        }
        let resolved = fs::canonicalize(&full).map_err(|err| map_io_error(path, &err))?;
        if !resolved.starts_with(&self.root) {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        Ok(resolved)
    }
}

impl FileStore for DirectoryStore {
    fn read(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let resolved = self.resolve(path)?;
        if !resolved.is_file() {
            return Err(StoreError::Io(format!("{path} is not a regular file")));
        }
        read_bytes_with_limit(&resolved, self.max_bytes).map_err(|err| match err {
            ReadLimitError::Io(err) => map_io_error(path, &err),
            ReadLimitError::TooLarge {
                size,
                limit,
            } => StoreError::TooLarge(format!("{path} ({size} bytes, limit {limit})")),
        })
    }
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

/// Errors from bounded file reads.
enum ReadLimitError {
    /// Underlying IO failure.
    Io(io::Error),
    /// File exceeds the limit.
    TooLarge {
        /// Observed size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    // The file may grow between the metadata check and the read.
    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Maps an IO error to a store error for `path`.
fn map_io_error(path: &str, err: &io::Error) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound(path.to_string())
    } else {
        StoreError::Io(format!("{path}: {err}"))
    }
}
