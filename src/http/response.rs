//! Response building.
//!
//! # Responsibilities
//! - Render configured body and Location templates with token values
//! - Build status, headers and redirects for a matched route
//! - Provide the baseline 404 response
//!
//! # Design Decisions
//! - Header names and values are checked once, when routes are built
//! - Template placeholders that name no token are left as written

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::routing::{NotFoundResponse, Params, NOT_FOUND_BODY};

/// Default Content-Type for configured bodies.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

impl NotFoundResponse for Response {
    fn not_found() -> Self {
        (StatusCode::NOT_FOUND, Html(NOT_FOUND_BODY)).into_response()
    }
}

/// Replace each `{name}` with the value bound to token `name`.
///
/// Absent tokens render as nothing; unknown names stay literal.
pub fn render_template(template: &str, params: &Params) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if params.contains(&after[..close]) => {
                out.push_str(params.value(&after[..close]).unwrap_or(""));
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// A pre-validated response shape for one route.
#[derive(Debug, Clone)]
pub struct ResponseTemplate {
    pub status: StatusCode,
    pub body: String,
    pub content_type: HeaderValue,
    pub headers: Vec<(HeaderName, HeaderValue)>,
    pub redirect: Option<String>,
}

impl ResponseTemplate {
    /// Render the response for one matched request.
    pub fn render(&self, params: &Params) -> Response {
        let mut response = (self.status, render_template(&self.body, params)).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, self.content_type.clone());
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }

        if let Some(location) = &self.redirect {
            let location = render_template(location, params);
            match HeaderValue::from_str(&location) {
                Ok(value) => {
                    headers.insert(header::LOCATION, value);
                }
                Err(_) => {
                    tracing::warn!(location = %location, "Rendered Location is not a valid header value");
                }
            }
        }
        response
    }
}

/// A bare redirect to `location`.
pub fn redirect(status: StatusCode, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (status, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::warn!(location = %location, "Redirect target is not a valid header value");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}
