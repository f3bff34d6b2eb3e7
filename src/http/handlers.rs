//! Turns configured routes into a frozen dispatcher.

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::validation::parse_verb;
use crate::config::{NotFoundConfig, RouteConfig, RouterConfig};
use crate::http::response::{ResponseTemplate, DEFAULT_CONTENT_TYPE};
use crate::routing::{Dispatcher, RoutePatternError, RouterBuilder};

/// Errors raised while building a dispatcher from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("route `{path}`: unsupported method `{method}`")]
    UnsupportedMethod { path: String, method: String },

    #[error(transparent)]
    Pattern(#[from] RoutePatternError),

    #[error("route `{path}`: invalid status {status}")]
    InvalidStatus { path: String, status: u16 },

    #[error("route `{path}`: invalid header `{name}`")]
    InvalidHeader { path: String, name: String },
}

/// Build a dispatcher serving every configured route.
pub fn build_dispatcher(config: &RouterConfig) -> Result<Dispatcher<Response>, BuildError> {
    let mut builder = RouterBuilder::new();

    for route in &config.routes {
        let verb = parse_verb(&route.method).ok_or_else(|| BuildError::UnsupportedMethod {
            path: route.path.clone(),
            method: route.method.clone(),
        })?;
        let template = response_template(route)?;
        builder.route(verb, &route.path, move |params| template.render(params))?;
    }

    if let Some(not_found) = &config.not_found {
        let content_type =
            header_value("<not_found>", "content-type", not_found_content_type(not_found))?;
        let body = not_found.body.clone();
        builder.not_found(move || {
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, content_type.clone())],
                body.clone(),
            )
                .into_response()
        });
    }

    Ok(builder.build())
}

fn response_template(route: &RouteConfig) -> Result<ResponseTemplate, BuildError> {
    let status = StatusCode::from_u16(route.status).map_err(|_| BuildError::InvalidStatus {
        path: route.path.clone(),
        status: route.status,
    })?;

    let content_type = header_value(
        &route.path,
        "content-type",
        route.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE),
    )?;

    let headers = route
        .headers
        .iter()
        .map(|(name, value)| {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|_| BuildError::InvalidHeader {
                    path: route.path.clone(),
                    name: name.clone(),
                })?;
            Ok((header_name, header_value(&route.path, name, value)?))
        })
        .collect::<Result<Vec<_>, BuildError>>()?;

    Ok(ResponseTemplate {
        status,
        body: route.body.clone(),
        content_type,
        headers,
        redirect: route.redirect.clone(),
    })
}

fn header_value(path: &str, name: &str, value: &str) -> Result<HeaderValue, BuildError> {
    HeaderValue::from_str(value).map_err(|_| BuildError::InvalidHeader {
        path: path.to_string(),
        name: name.to_string(),
    })
}

fn not_found_content_type(config: &NotFoundConfig) -> &str {
    config.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
}
