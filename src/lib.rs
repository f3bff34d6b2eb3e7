//! Tiny HTTP request router.
//!
//! Routes are patterns such as `/product/{id}` registered per verb class
//! (GET/HEAD or POST). A request path is resolved to one handler, which
//! receives the token values; everything else falls through to the
//! not-found handler.
//!
//! ```
//! use axum::http::Method;
//! use tiny_router::routing::{Params, RouterBuilder};
//!
//! let mut builder = RouterBuilder::new();
//! builder
//!     .get("/users/{id}", |p: &Params| format!("user {}", p.value("id").unwrap_or("?")))
//!     .unwrap();
//! builder.not_found(|| "nothing here".to_string());
//! let dispatcher = builder.build();
//!
//! assert_eq!(dispatcher.dispatch(&Method::GET, "/users/42"), "user 42");
//! assert_eq!(dispatcher.dispatch(&Method::GET, "/users/42/edit"), "nothing here");
//! assert_eq!(dispatcher.dispatch(&Method::POST, "/users/42"), "nothing here");
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Dispatcher, Params, RouterBuilder, TokenValue};
