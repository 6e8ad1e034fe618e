//! Nested JSON Lookup
//!
//! Walk a path of object keys through a [`serde_json::Value`]. Absent keys
//! are an error rather than `null`, so callers can tell "missing" from
//! "present but empty".

use serde_json::Value;
use thiserror::Error;

/// A key expected in a JSON object was not there
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("missing key '{key}' (path: {})", .path.join("."))]
pub struct LookupError {
    /// The first key that could not be resolved
    pub key: String,
    /// The full path that was requested
    pub path: Vec<String>,
}

impl LookupError {
    /// Lookup failure for `key` within `path`
    pub fn new(key: impl Into<String>, path: &[&str]) -> Self {
        Self {
            key: key.into(),
            path: path.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

/// Follow `path` through nested objects.
///
/// Fails on the first key that is absent, or whose parent is not an object.
/// An empty path returns `value` itself.
pub fn access_nested_map<'a>(value: &'a Value, path: &[&str]) -> Result<&'a Value, LookupError> {
    path.iter().try_fold(value, |current, key| {
        current
            .as_object()
            .and_then(|map| map.get(*key))
            .ok_or_else(|| LookupError::new(*key, path))
    })
}

/// [`access_nested_map`] that also requires the target to be a string.
///
/// A present but non-string value is reported as a lookup failure on the
/// last key.
pub fn access_nested_str<'a>(value: &'a Value, path: &[&str]) -> Result<&'a str, LookupError> {
    access_nested_map(value, path)?
        .as_str()
        .ok_or_else(|| LookupError::new(path.last().copied().unwrap_or_default(), path))
}
