//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route methods and patterns
//! - Validate value ranges (timeouts > 0, status codes, addresses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::{RoutePattern, RoutePatternError, VerbClass};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address is empty")]
    EmptyBindAddress,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("http.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("routes[{index}]: unsupported method `{method}` (expected GET or POST)")]
    UnsupportedMethod { index: usize, method: String },

    #[error("routes[{index}]: {source}")]
    Pattern {
        index: usize,
        source: RoutePatternError,
    },

    #[error("routes[{index}]: status {status} is not a valid HTTP status")]
    InvalidStatus { index: usize, status: u16 },
}

/// Map a configured method name onto a verb class.
///
/// HEAD is not accepted: it is always served by the GET route.
pub fn parse_verb(method: &str) -> Option<VerbClass> {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Some(VerbClass::Get),
        "POST" => Some(VerbClass::Post),
        _ => None,
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for (index, route) in config.routes.iter().enumerate() {
        if parse_verb(&route.method).is_none() {
            errors.push(ValidationError::UnsupportedMethod {
                index,
                method: route.method.clone(),
            });
        }
        if let Err(source) = RoutePattern::parse(&route.path) {
            errors.push(ValidationError::Pattern { index, source });
        }
        if !(100..=599).contains(&route.status) {
            errors.push(ValidationError::InvalidStatus {
                index,
                status: route.status,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
