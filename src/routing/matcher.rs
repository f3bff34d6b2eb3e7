//! Route matching logic.
//!
//! # Responsibilities
//! - Walk a request path to find the registered base path it starts with
//! - Split off the remaining segments as positional token values
//! - Bind token values to token names with strict arity
//!
//! # Design Decisions
//! - Shortest registered base path wins: the walk stops at the first hit
//! - The last segment is never folded into a candidate; at least one
//!   segment is left over as a value whenever the path has one
//! - `/` is the only candidate for paths with zero or one segment
//! - Excess values are a miss; missing values bind as [`TokenValue::Absent`]

use crate::routing::params::{Params, TokenValue};

/// Outcome of a successful base-path walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatch<'p> {
    /// The matched base path (always ends with `/`).
    pub base_path: String,
    /// Segments after the base path, in order.
    pub values: Vec<&'p str>,
}

/// Token values did not fit the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityMismatch {
    pub expected: usize,
    pub supplied: usize,
}

/// Split a normalized path into its segments. `/` has none.
pub fn segments(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// Walk `path` one segment at a time, accumulating candidate base paths
/// (`/a/`, `/a/b/`, ...) and stop at the first one `is_registered` accepts.
pub fn scan_base_path<'p, F>(path: &'p str, is_registered: F) -> Option<PrefixMatch<'p>>
where
    F: Fn(&str) -> bool,
{
    let parts = segments(path);
    let mut base_path = String::from("/");
    let mut used = 0;

    while used + 1 < parts.len() {
        base_path.push_str(parts[used]);
        base_path.push('/');
        used += 1;

        if is_registered(&base_path) {
            break;
        }
    }

    if !is_registered(&base_path) {
        tracing::trace!(path = %path, last_candidate = %base_path, "No base path matched");
        return None;
    }

    Some(PrefixMatch {
        base_path,
        values: parts[used..].to_vec(),
    })
}

/// Pair `tokens[i]` with `values[i]`.
///
/// More values than tokens is a mismatch; fewer pads the tail with
/// [`TokenValue::Absent`].
pub fn bind_tokens(tokens: &[String], values: &[&str]) -> Result<Params, ArityMismatch> {
    if values.len() > tokens.len() {
        return Err(ArityMismatch {
            expected: tokens.len(),
            supplied: values.len(),
        });
    }

    let mut params = Params::with_capacity(tokens.len());
    for (i, name) in tokens.iter().enumerate() {
        params.insert(name.as_str(), TokenValue::from(values.get(i).copied()));
    }
    Ok(params)
}
