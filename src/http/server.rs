//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app: one fallback handler feeding the dispatcher
//! - Wire up middleware (tracing, timeout, request ID)
//! - Normalize each request to `(method, path)` and dispatch it
//! - Swap in a freshly built dispatcher when the config changes
//! - Observability (metrics, request IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, Method, StatusCode, Uri},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{HttpConfig, RouterConfig};
use crate::http::handlers::{build_dispatcher, BuildError};
use crate::http::request::{canonical_location, normalize_path, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::redirect;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics::{self, Outcome};
use crate::routing::{Dispatcher, Resolution};

/// Dispatcher slot shared between request handlers and the reload task.
pub type SharedDispatcher = Arc<ArcSwap<Dispatcher<Response>>>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: SharedDispatcher,
    pub http: HttpConfig,
}

/// HTTP front end for the dispatcher.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    dispatcher: SharedDispatcher,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RouterConfig) -> Result<Self, BuildError> {
        let dispatcher = build_dispatcher(&config)?;
        metrics::set_routes_registered(dispatcher.table().len());
        let dispatcher: SharedDispatcher = Arc::new(ArcSwap::from_pointee(dispatcher));

        let state = AppState {
            dispatcher: dispatcher.clone(),
            http: config.http.clone(),
        };

        let router = Self::build_router(&config.http, state);
        Ok(Self {
            router,
            config,
            dispatcher,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(http: &HttpConfig, state: AppState) -> Router {
        let request_id_header = HeaderName::from_bytes(http.request_id_header.as_bytes())
            .unwrap_or_else(|_| {
                tracing::warn!(
                    header = %http.request_id_header,
                    "Invalid request ID header name, using default"
                );
                HeaderName::from_static(X_REQUEST_ID)
            });

        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(http.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
    }

    /// The Axum app, for serving or driving in-process.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the live dispatcher slot.
    pub fn dispatcher(&self) -> SharedDispatcher {
        self.dispatcher.clone()
    }

    /// Build a dispatcher from `config` and publish it.
    ///
    /// On error the current dispatcher stays in place.
    pub fn reload(&self, config: &RouterConfig) -> Result<(), BuildError> {
        swap_dispatcher(&self.dispatcher, config)
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Route changes arrive on `config_updates`; listener and transport
    /// settings only take effect on restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.dispatcher.load().table().len(),
            "HTTP server starting"
        );

        let slot = self.dispatcher.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = swap_dispatcher(&slot, &config) {
                    tracing::error!(error = %e, "Rejected reloaded routes; keeping current table");
                }
            }
        });

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

fn swap_dispatcher(slot: &SharedDispatcher, config: &RouterConfig) -> Result<(), BuildError> {
    let dispatcher = build_dispatcher(config)?;
    let routes = dispatcher.table().len();
    slot.store(Arc::new(dispatcher));
    metrics::set_routes_registered(routes);
    tracing::info!(routes = routes, "Route table swapped");
    Ok(())
}

/// Single entry point for every request.
async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers, &state.http.request_id_header);

    if state.http.redirect_trailing_slash {
        if let Some(location) = canonical_location(&uri) {
            tracing::debug!(
                request_id = %request_id,
                path = %uri.path(),
                location = %location,
                "Redirecting to canonical path"
            );
            metrics::record_request(&method, Outcome::Redirected, start_time);
            return redirect(StatusCode::MOVED_PERMANENTLY, &location);
        }
    }

    let path = normalize_path(uri.path());
    let dispatcher = state.dispatcher.load_full();
    let resolution = dispatcher.resolve(&method, path);

    match resolution {
        Resolution::Matched { entry, params } => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                route = %entry.pattern(),
                params = %params,
                "Route matched"
            );
            metrics::record_request(&method, Outcome::Matched, start_time);
            entry.call(&params)
        }
        Resolution::NotFound(reason) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                reason = %reason,
                "No route matched"
            );
            metrics::record_request(&method, Outcome::NotFound, start_time);
            dispatcher.not_found()
        }
    }
}

/// The request ID set by the request-ID layer, or `unknown`.
fn request_id<'h>(headers: &'h HeaderMap, header_name: &str) -> &'h str {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    fn server() -> HttpServer {
        let mut config = RouterConfig::default();
        config.routes.push(RouteConfig::get("/users/{id}", "user {id}"));
        HttpServer::new(config).unwrap()
    }

    fn get(uri: &str, request_id: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(X_REQUEST_ID, request_id)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_request_id_lookup() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers, X_REQUEST_ID), "unknown");
        headers.insert(X_REQUEST_ID, "abc".parse().unwrap());
        assert_eq!(request_id(&headers, X_REQUEST_ID), "abc");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_dispatch_logs_carry_request_id() {
        let app = server().app();

        let response = app.clone().oneshot(get("/users/7", "req-matched")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = app.oneshot(get("/nowhere", "req-missed")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        assert!(logs_contain("request_id=req-matched"));
        assert!(logs_contain("request_id=req-missed"));
    }

    #[tokio::test]
    async fn test_reload_replaces_table() {
        let server = server();
        let slot = server.dispatcher();
        assert_eq!(slot.load().table().len(), 1);

        let mut config = RouterConfig::default();
        config.routes.push(RouteConfig::get("/a", "a"));
        config.routes.push(RouteConfig::post("/b", "b"));
        server.reload(&config).unwrap();
        assert_eq!(slot.load().table().len(), 2);
    }
}
