//! Route storage.
//!
//! # Responsibilities
//! - Hold one base-path keyed map per verb class
//! - Parse patterns on registration
//! - Exact and base-prefix lookup
//!
//! # Design Decisions
//! - GET and HEAD share one map; POST has its own
//! - Re-registering a base path replaces the earlier entry
//! - Entries are immutable once stored

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::routing::matcher::{scan_base_path, PrefixMatch};
use crate::routing::pattern::{RoutePattern, RoutePatternError};
use crate::routing::params::Params;

/// Handler invoked with the bound token values of a matched route.
pub type RouteHandler<R> = Arc<dyn Fn(&Params) -> R + Send + Sync>;

/// Group of HTTP methods that share a route map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerbClass {
    /// GET and HEAD.
    Get,
    /// POST.
    Post,
}

impl VerbClass {
    /// Map a request method onto its verb class.
    pub fn from_method(method: &Method) -> Option<Self> {
        if *method == Method::GET || *method == Method::HEAD {
            Some(VerbClass::Get)
        } else if *method == Method::POST {
            Some(VerbClass::Post)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerbClass::Get => "GET",
            VerbClass::Post => "POST",
        }
    }
}

impl fmt::Display for VerbClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered route.
pub struct RouteEntry<R> {
    pattern: RoutePattern,
    handler: RouteHandler<R>,
}

impl<R> RouteEntry<R> {
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn base_path(&self) -> &str {
        self.pattern.base_path()
    }

    pub fn tokens(&self) -> &[String] {
        self.pattern.tokens()
    }

    /// Invoke the bound handler.
    pub fn call(&self, params: &Params) -> R {
        (self.handler)(params)
    }
}

// Handlers are opaque closures, so Debug is written by hand.
impl<R> fmt::Debug for RouteEntry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("pattern", &self.pattern.as_str())
            .field("base_path", &self.pattern.base_path())
            .field("tokens", &self.pattern.tokens())
            .finish_non_exhaustive()
    }
}

/// Base-path keyed route maps, one per verb class.
pub struct RouteTable<R> {
    get_routes: HashMap<String, RouteEntry<R>>,
    post_routes: HashMap<String, RouteEntry<R>>,
}

impl<R> RouteTable<R> {
    pub fn new() -> Self {
        Self {
            get_routes: HashMap::new(),
            post_routes: HashMap::new(),
        }
    }

    /// Parse `pattern` and store it under its base path.
    pub fn register(
        &mut self,
        verb: VerbClass,
        pattern: &str,
        handler: RouteHandler<R>,
    ) -> Result<(), RoutePatternError> {
        let pattern = RoutePattern::parse(pattern)?;

        if pattern.has_trailing_literals() {
            tracing::warn!(
                verb = %verb,
                pattern = %pattern.as_str(),
                "Literal text after the first token is ignored when matching"
            );
        } else if pattern.has_tokens() && !pattern.base_path().ends_with('/') {
            tracing::warn!(
                verb = %verb,
                pattern = %pattern.as_str(),
                "Base path does not end at a segment boundary; route can never match"
            );
        }

        let base_path = pattern.base_path().to_string();
        tracing::debug!(
            verb = %verb,
            pattern = %pattern.as_str(),
            base_path = %base_path,
            tokens = pattern.tokens().len(),
            "Route registered"
        );

        let entry = RouteEntry { pattern, handler };
        if let Some(previous) = self.map_mut(verb).insert(base_path, entry) {
            tracing::warn!(
                verb = %verb,
                base_path = %previous.base_path(),
                replaced = %previous.pattern(),
                "Route replaced an earlier registration"
            );
        }
        Ok(())
    }

    /// Exact lookup, treating the full path as a base-path key.
    pub fn lookup(&self, verb: VerbClass, exact_path: &str) -> Option<&RouteEntry<R>> {
        self.map(verb).get(exact_path)
    }

    /// Walk `path` for the first registered base path; return the entry
    /// and the leftover segments.
    pub fn lookup_by_base_prefix<'p>(
        &self,
        verb: VerbClass,
        path: &'p str,
    ) -> Option<(&RouteEntry<R>, Vec<&'p str>)> {
        let routes = self.map(verb);
        let PrefixMatch { base_path, values } =
            scan_base_path(path, |candidate| routes.contains_key(candidate))?;
        routes.get(&base_path).map(|entry| (entry, values))
    }

    /// Number of routes across both verb classes.
    pub fn len(&self) -> usize {
        self.get_routes.len() + self.post_routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All routes, GET class first, each class sorted by base path.
    pub fn routes(&self) -> Vec<(VerbClass, &RouteEntry<R>)> {
        let mut listed = Vec::with_capacity(self.len());
        for verb in [VerbClass::Get, VerbClass::Post] {
            let mut entries: Vec<_> = self.map(verb).values().collect();
            entries.sort_by(|a, b| a.base_path().cmp(b.base_path()));
            listed.extend(entries.into_iter().map(|entry| (verb, entry)));
        }
        listed
    }

    fn map(&self, verb: VerbClass) -> &HashMap<String, RouteEntry<R>> {
        match verb {
            VerbClass::Get => &self.get_routes,
            VerbClass::Post => &self.post_routes,
        }
    }

    fn map_mut(&mut self, verb: VerbClass) -> &mut HashMap<String, RouteEntry<R>> {
        match verb {
            VerbClass::Get => &mut self.get_routes,
            VerbClass::Post => &mut self.post_routes,
        }
    }
}

impl<R> Default for RouteTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for RouteTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("get_routes", &self.get_routes.values().collect::<Vec<_>>())
            .field("post_routes", &self.post_routes.values().collect::<Vec<_>>())
            .finish()
    }
}
