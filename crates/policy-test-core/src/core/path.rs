// crates/policy-test-core/src/core/path.rs
// ============================================================================
// Module: Policy Test Store Paths
// Description: Lexical helpers for slash-separated file store paths.
// Purpose: Resolve suite-relative artifact paths against the suite directory.
// Dependencies: none
// ============================================================================

//! ## Overview
//! File store paths are slash-separated and relative to the store root.
//! Joining is purely lexical: `.` segments drop out, `..` pops the previous
//! segment, and leading `..` segments are kept so stores can reject them.

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the directory portion of a store path, or `"."` when there is none.
///
/// A leading `/` refers to the store root, so `/suite.yaml` has directory
/// `"."` and `/a/suite.yaml` has directory `"a"`.
#[must_use]
pub fn parent_dir(path: &str) -> &str {
    match path.trim_start_matches('/').rsplit_once('/') {
        Some((dir, _)) => dir,
        None => ".",
    }
}

/// Joins `relative` onto `dir` and cleans the result.
#[must_use]
pub fn join_path(dir: &str, relative: &str) -> String {
    if relative.starts_with('/') {
        return clean_path(relative);
    }
    clean_path(&format!("{dir}/{relative}"))
}

/// Lexically cleans a store path.
#[must_use]
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
