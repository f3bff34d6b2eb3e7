//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Transport behavior around the dispatcher.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route definitions, registered in order.
    pub routes: Vec<RouteConfig>,

    /// Custom not-found response.
    pub not_found: Option<NotFoundConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Answer paths without a trailing slash with a 301 to the
    /// slash-terminated form.
    pub redirect_trailing_slash: bool,

    /// Header carrying the request ID.
    pub request_id_header: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            redirect_trailing_slash: false,
            request_id_header: "x-request-id".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Full,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A single route and the response it produces.
///
/// `body` and `redirect` are templates: `{name}` is replaced with the
/// value bound to token `name`, or nothing when the token is absent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// GET or POST. HEAD is served by GET routes.
    #[serde(default = "default_method")]
    pub method: String,

    /// Route pattern, e.g. "/users/{id}".
    pub path: String,

    /// Response status code.
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response body template.
    #[serde(default)]
    pub body: String,

    /// Content-Type header value.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Extra response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Location header template.
    #[serde(default)]
    pub redirect: Option<String>,
}

impl RouteConfig {
    /// A GET route answering 200 with `body`.
    pub fn get(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: default_method(),
            path: path.into(),
            status: default_status(),
            body: body.into(),
            content_type: None,
            headers: BTreeMap::new(),
            redirect: None,
        }
    }

    /// A POST route answering 200 with `body`.
    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: "POST".to_string(),
            ..Self::get(path, body)
        }
    }
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_status() -> u16 {
    200
}

/// Custom not-found response. Status is always 404.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NotFoundConfig {
    pub body: String,
    pub content_type: Option<String>,
}
