//! Route lookup.
//!
//! # Responsibilities
//! - Store the registered routes
//! - Look up the handler for a request path
//! - Return the matched route with its context, or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) prefix scan (acceptable for typical route counts)
//! - Longest prefix wins; on a tie the first registered route wins
//! - Duplicate prefixes are rejected at construction

use std::fmt;
use std::sync::Arc;

use crate::handlers::Handler;
use crate::routing::matcher::{context_segments, PathPrefixMatcher};

/// Errors raised while building the route table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("route prefix '{0}' must start with '/'")]
    InvalidPrefix(String),
    #[error("route prefix '{0}' is registered more than once")]
    DuplicatePrefix(String),
}

/// A (prefix, handler) registration.
#[derive(Clone)]
pub struct Route {
    matcher: PathPrefixMatcher,
    handler: Arc<dyn Handler>,
}

impl Route {
    pub fn new(prefix: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self::shared(prefix, Arc::new(handler))
    }

    pub fn shared(prefix: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        Self {
            matcher: PathPrefixMatcher::new(prefix),
            handler,
        }
    }

    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").field("prefix", &self.prefix()).finish()
    }
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    /// Path segments after the prefix.
    pub context: Vec<String>,
}

/// Ordered route table.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteError> {
        for (i, route) in routes.iter().enumerate() {
            if !route.prefix().starts_with('/') {
                return Err(RouteError::InvalidPrefix(route.prefix().to_string()));
            }
            if routes[..i].iter().any(|r| r.prefix() == route.prefix()) {
                return Err(RouteError::DuplicatePrefix(route.prefix().to_string()));
            }
        }
        Ok(Self { routes })
    }

    /// Find the most specific route for `path`.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        let mut best: Option<(&Route, &str)> = None;
        for route in &self.routes {
            let Some(rest) = route.matcher.strip(path) else {
                continue;
            };
            let better = best.map_or(true, |(b, _)| {
                route.matcher.specificity() > b.matcher.specificity()
            });
            if better {
                best = Some((route, rest));
            }
        }
        let (route, rest) = best?;
        let context = context_segments(rest)?;
        Some(RouteMatch { route, context })
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(Route::prefix)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
