//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Collect routes and the not-found handler at configuration time
//! - Freeze them into an immutable [`Dispatcher`]
//! - Resolve `(method, path)` to exactly one handler invocation
//!
//! # Design Decisions
//! - Registration lives on [`RouterBuilder`]; [`Dispatcher`] has no
//!   mutation API, so it can be shared across threads without locks
//! - Exact match first, then base-prefix scan with strict arity
//! - Request-time misses are values ([`NotFoundReason`]), never errors

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::routing::matcher::bind_tokens;
use crate::routing::params::Params;
use crate::routing::pattern::RoutePatternError;
use crate::routing::table::{RouteEntry, RouteTable, VerbClass};

/// Handler invoked when no route matches.
pub type NotFoundHandler<R> = Arc<dyn Fn() -> R + Send + Sync>;

/// Baseline not-found output used when no handler was configured.
pub trait NotFoundResponse {
    fn not_found() -> Self;
}

/// Body of the built-in not-found response.
pub const NOT_FOUND_BODY: &str = "<h1>404 Not Found</h1>";

impl NotFoundResponse for String {
    fn not_found() -> Self {
        NOT_FOUND_BODY.to_string()
    }
}

impl NotFoundResponse for () {
    fn not_found() -> Self {}
}

/// Why a request fell through to the not-found handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// Method outside the GET/HEAD and POST verb classes.
    UnsupportedMethod,
    /// Neither the exact path nor any base path is registered.
    NoRoute,
    /// The path carries more segments than the route declares tokens.
    ExcessSegments { expected: usize, supplied: usize },
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::UnsupportedMethod => write!(f, "unsupported method"),
            NotFoundReason::NoRoute => write!(f, "no route"),
            NotFoundReason::ExcessSegments { expected, supplied } => {
                write!(f, "{} segments supplied, route declares {}", supplied, expected)
            }
        }
    }
}

/// Result of resolving a request without invoking anything.
#[derive(Debug)]
pub enum Resolution<'a, R> {
    Matched {
        entry: &'a RouteEntry<R>,
        params: Params,
    },
    NotFound(NotFoundReason),
}

impl<R> Resolution<'_, R> {
    pub fn is_match(&self) -> bool {
        matches!(self, Resolution::Matched { .. })
    }
}

/// Configuration-time registration surface.
pub struct RouterBuilder<R> {
    table: RouteTable<R>,
    not_found: Option<NotFoundHandler<R>>,
}

impl<R> RouterBuilder<R> {
    pub fn new() -> Self {
        Self {
            table: RouteTable::new(),
            not_found: None,
        }
    }

    /// Register a GET route. HEAD requests resolve against it too.
    pub fn get<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RoutePatternError>
    where
        F: Fn(&Params) -> R + Send + Sync + 'static,
    {
        self.route(VerbClass::Get, pattern, handler)
    }

    /// Register a POST route.
    pub fn post<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RoutePatternError>
    where
        F: Fn(&Params) -> R + Send + Sync + 'static,
    {
        self.route(VerbClass::Post, pattern, handler)
    }

    /// Register a route for an explicit verb class.
    pub fn route<F>(
        &mut self,
        verb: VerbClass,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RoutePatternError>
    where
        F: Fn(&Params) -> R + Send + Sync + 'static,
    {
        self.table.register(verb, pattern, Arc::new(handler))?;
        Ok(self)
    }

    /// Set the not-found handler, replacing any earlier one.
    pub fn not_found<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        if self.not_found.is_some() {
            tracing::debug!("Replacing not-found handler");
        }
        self.not_found = Some(Arc::new(handler));
        self
    }

    /// Freeze the routes.
    pub fn build(self) -> Dispatcher<R> {
        tracing::info!(routes = self.table.len(), "Route table frozen");
        Dispatcher {
            table: self.table,
            not_found: self.not_found,
        }
    }
}

impl<R> Default for RouterBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable route table plus not-found handler.
pub struct Dispatcher<R> {
    table: RouteTable<R>,
    not_found: Option<NotFoundHandler<R>>,
}

impl<R> Dispatcher<R> {
    pub fn builder() -> RouterBuilder<R> {
        RouterBuilder::new()
    }

    /// Find the route for `(method, path)`.
    ///
    /// `path` is expected without query string or trailing slash; an empty
    /// path is treated as `/`.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_, R> {
        let path = if path.is_empty() { "/" } else { path };

        let Some(verb) = VerbClass::from_method(method) else {
            return Resolution::NotFound(NotFoundReason::UnsupportedMethod);
        };

        if let Some(entry) = self.table.lookup(verb, path) {
            if entry.tokens().is_empty() {
                return Resolution::Matched {
                    entry,
                    params: Params::new(),
                };
            }
        }

        let Some((entry, values)) = self.table.lookup_by_base_prefix(verb, path) else {
            return Resolution::NotFound(NotFoundReason::NoRoute);
        };

        match bind_tokens(entry.tokens(), &values) {
            Ok(params) => Resolution::Matched { entry, params },
            Err(mismatch) => Resolution::NotFound(NotFoundReason::ExcessSegments {
                expected: mismatch.expected,
                supplied: mismatch.supplied,
            }),
        }
    }

    /// Resolve and invoke exactly one handler.
    pub fn dispatch(&self, method: &Method, path: &str) -> R
    where
        R: NotFoundResponse,
    {
        match self.resolve(method, path) {
            Resolution::Matched { entry, params } => {
                tracing::debug!(
                    method = %method,
                    path = %path,
                    route = %entry.pattern(),
                    params = %params,
                    "Route matched"
                );
                entry.call(&params)
            }
            Resolution::NotFound(reason) => {
                tracing::debug!(method = %method, path = %path, reason = %reason, "No route matched");
                self.not_found()
            }
        }
    }

    /// Invoke the configured not-found handler, or the baseline one.
    pub fn not_found(&self) -> R
    where
        R: NotFoundResponse,
    {
        match &self.not_found {
            Some(handler) => handler(),
            None => R::not_found(),
        }
    }

    pub fn table(&self) -> &RouteTable<R> {
        &self.table
    }
}

impl<R> fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("table", &self.table)
            .field("custom_not_found", &self.not_found.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(name: &'static str) -> impl Fn(&Params) -> String + Send + Sync + 'static {
        move |params: &Params| format!("{}{}", name, params)
    }

    fn dispatcher() -> Dispatcher<String> {
        let mut builder = Dispatcher::builder();
        builder
            .get("/", echo("home"))
            .unwrap()
            .get("/about", echo("about"))
            .unwrap()
            .get("/users/{id}", echo("user"))
            .unwrap()
            .get("/item/{id}/{sub}", echo("item"))
            .unwrap()
            .post("/users/{id}", echo("update"))
            .unwrap();
        builder.not_found(|| "missing".to_string());
        builder.build()
    }

    #[test]
    fn test_exact_match_has_empty_params() {
        let d = dispatcher();
        assert_eq!(d.dispatch(&Method::GET, "/about"), "about{}");
        assert_eq!(d.dispatch(&Method::GET, "/"), "home{}");
    }

    #[test]
    fn test_empty_path_is_root() {
        assert_eq!(dispatcher().dispatch(&Method::GET, ""), "home{}");
    }

    #[test]
    fn test_token_route() {
        let d = dispatcher();
        assert_eq!(d.dispatch(&Method::GET, "/users/42"), "user{id=\"42\"}");
        assert_eq!(d.dispatch(&Method::POST, "/users/42"), "update{id=\"42\"}");
    }

    #[test]
    fn test_excess_segments_not_found() {
        let d = dispatcher();
        assert_eq!(d.dispatch(&Method::GET, "/users/42/edit"), "missing");
        match d.resolve(&Method::GET, "/users/42/edit") {
            Resolution::NotFound(reason) => assert_eq!(
                reason,
                NotFoundReason::ExcessSegments { expected: 1, supplied: 2 }
            ),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_missing_tokens_are_absent() {
        let d = dispatcher();
        assert_eq!(d.dispatch(&Method::GET, "/item/5"), "item{id=\"5\", sub=<absent>}");
    }

    #[test]
    fn test_head_uses_get_table() {
        let d = dispatcher();
        assert_eq!(d.dispatch(&Method::HEAD, "/users/7"), d.dispatch(&Method::GET, "/users/7"));
        assert_eq!(d.dispatch(&Method::HEAD, "/about"), "about{}");
    }

    #[test]
    fn test_wrong_verb_and_unsupported_method() {
        let d = dispatcher();
        assert_eq!(d.dispatch(&Method::POST, "/about"), "missing");
        assert_eq!(d.dispatch(&Method::DELETE, "/about"), "missing");
        assert!(matches!(
            d.resolve(&Method::PUT, "/about"),
            Resolution::NotFound(NotFoundReason::UnsupportedMethod)
        ));
        assert!(matches!(
            d.resolve(&Method::POST, "/about"),
            Resolution::NotFound(NotFoundReason::NoRoute)
        ));
    }

    #[test]
    fn test_baseline_not_found() {
        let mut builder: RouterBuilder<String> = RouterBuilder::new();
        builder.get("/a", echo("a")).unwrap();
        let d = builder.build();
        assert_eq!(d.dispatch(&Method::GET, "/b"), NOT_FOUND_BODY);
    }

    #[test]
    fn test_not_found_handler_replaced() {
        let mut builder: RouterBuilder<String> = RouterBuilder::new();
        builder.not_found(|| "first".into());
        builder.not_found(|| "second".into());
        assert_eq!(builder.build().dispatch(&Method::GET, "/x"), "second");
    }

    #[test]
    fn test_token_route_reached_through_exact_key() {
        // `/` is the stored key of `/{page}`; the exact lookup hits it but
        // the route needs tokens, so the scan takes over.
        let mut builder: RouterBuilder<String> = RouterBuilder::new();
        builder.get("/{page}", echo("page")).unwrap();
        let d = builder.build();
        assert_eq!(d.dispatch(&Method::GET, "/"), "page{page=<absent>}");
        assert_eq!(d.dispatch(&Method::GET, "/intro"), "page{page=\"intro\"}");
    }

    #[test]
    fn test_exact_route_wins_over_token_route() {
        let mut builder: RouterBuilder<String> = RouterBuilder::new();
        builder.get("/users/{id}", echo("user")).unwrap();
        builder.get("/users/me", echo("me")).unwrap();
        let d = builder.build();
        assert_eq!(d.dispatch(&Method::GET, "/users/me"), "me{}");
        assert_eq!(d.dispatch(&Method::GET, "/users/9"), "user{id=\"9\"}");
    }

    #[test]
    fn test_shortest_base_path_shadows_longer() {
        let mut builder: RouterBuilder<String> = RouterBuilder::new();
        builder.get("/a/{x}/{y}", echo("short")).unwrap();
        builder.get("/a/b/{z}", echo("long")).unwrap();
        let d = builder.build();
        assert_eq!(d.dispatch(&Method::GET, "/a/b/c"), "short{x=\"b\", y=\"c\"}");
    }

    #[test]
    fn test_zero_token_prefix_route_rejects_extra_segments() {
        let mut builder: RouterBuilder<String> = RouterBuilder::new();
        builder.get("/docs/", echo("docs")).unwrap();
        let d = builder.build();
        assert_eq!(d.dispatch(&Method::GET, "/docs/intro"), NOT_FOUND_BODY);
    }

    #[test]
    fn test_mid_segment_token_never_matches() {
        let mut builder: RouterBuilder<String> = RouterBuilder::new();
        builder.get("/file-{id}", echo("file")).unwrap();
        let d = builder.build();

        assert_eq!(d.table().len(), 1);
        for path in ["/file-7", "/file-", "/file-7/x"] {
            assert!(
                matches!(
                    d.resolve(&Method::GET, path),
                    Resolution::NotFound(NotFoundReason::NoRoute)
                ),
                "{} should not match",
                path
            );
        }
    }

    #[test]
    fn test_dispatcher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dispatcher<String>>();
    }
}
