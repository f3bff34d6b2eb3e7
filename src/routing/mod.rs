//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     RouterBuilder::get / post (pattern, handler)
//!     → pattern.rs (split into base path + token names)
//!     → table.rs (store under base path, per verb class)
//!     → build() freezes into an immutable Dispatcher
//!
//! Incoming Request (method, normalized path)
//!     → router.rs (exact lookup, zero-token routes)
//!     → matcher.rs (base-path walk, positional token binding)
//!     → route handler(Params) or not-found handler
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex: one hash lookup per candidate base path
//! - Deterministic: same input always matches same route
//! - First (shortest) registered base path wins

pub mod matcher;
pub mod params;
pub mod pattern;
pub mod router;
pub mod table;

pub use params::{Params, TokenValue};
pub use pattern::{RoutePattern, RoutePatternError};
pub use router::{
    Dispatcher, NotFoundHandler, NotFoundReason, NotFoundResponse, Resolution, RouterBuilder,
    NOT_FOUND_BODY,
};
pub use table::{RouteEntry, RouteHandler, RouteTable, VerbClass};
