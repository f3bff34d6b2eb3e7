//! Shared utilities for integration tests.

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tiny_router::config::{NotFoundConfig, RouteConfig, RouterConfig};
use tiny_router::http::HttpServer;
use tiny_router::lifecycle::Shutdown;

/// A small shop: static pages, token routes, a form and a custom 404.
#[allow(dead_code)]
pub fn shop_config() -> RouterConfig {
    let mut config = RouterConfig::default();
    config.routes.push(RouteConfig::get("/", "home"));
    config.routes.push(RouteConfig::get("/about", "about us"));
    config.routes.push(RouteConfig::get("/product/{id}", "product {id}"));
    config
        .routes
        .push(RouteConfig::get("/item/{id}/{sub}", "item {id} sub={sub}"));
    config.routes.push(RouteConfig::post("/product/{id}", "saved {id}"));

    let mut legacy = RouteConfig::get("/old/{id}", "");
    legacy.status = 302;
    legacy.redirect = Some("/product/{id}".into());
    config.routes.push(legacy);

    config.not_found = Some(NotFoundConfig {
        body: "no such page".into(),
        content_type: Some("text/plain".into()),
    });
    config
}

/// Build a request with an empty body.
#[allow(dead_code)]
pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as UTF-8.
#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Start a server on an ephemeral port.
///
/// Returns its address, the shutdown coordinator and a sender for route
/// reloads.
#[allow(dead_code)]
pub async fn start_server(
    config: RouterConfig,
) -> (SocketAddr, Shutdown, mpsc::UnboundedSender<RouterConfig>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates_tx, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    (addr, shutdown, updates_tx)
}
