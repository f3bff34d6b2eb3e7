//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, trailing-slash policy, path normalization)
//!     → routing::Dispatcher (resolve method + path)
//!     → handlers.rs / response.rs (render configured response or 404)
//!     → Send to client
//!
//! report.rs inspects the same dispatcher offline for the CLI.
//! ```

pub mod handlers;
pub mod report;
pub mod request;
pub mod response;
pub mod server;

pub use handlers::{build_dispatcher, BuildError};
pub use request::{normalize_path, X_REQUEST_ID};
pub use server::{AppState, HttpServer, SharedDispatcher};
