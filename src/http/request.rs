//! Request handling and normalization.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Reduce the request URI to the `(method, path)` pair the dispatcher
//!   expects: no query string, no trailing slash, `/` kept as `/`
//! - Compute the canonical slash-terminated location for redirects
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Normalization never rejects a request; odd paths simply miss

use axum::http::{Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Default header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 request ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}

/// Strip trailing slashes; the root stays `/`.
pub fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// The slash-terminated form of `uri`, if it is not already in it.
///
/// The query string is carried over unchanged.
pub fn canonical_location(uri: &Uri) -> Option<String> {
    let path = uri.path();
    if path.ends_with('/') {
        return None;
    }
    Some(match uri.query() {
        Some(query) => format!("{}/?{}", path, query),
        None => format!("{}/", path),
    })
}
