//! Named API sub-handler routing.
//!
//! # Responsibilities
//! - Resolve the leading context segment(s) to a registered sub-handler
//! - Hand the remaining segments to that sub-handler as its context
//!
//! # Design Decisions
//! - Names are segment paths; `"test"` and `"v1/items"` are both valid
//! - Longest registered name wins, registration order breaks ties
//! - An empty name registers the default used for an empty context

use std::sync::Arc;

use crate::handlers::{dispatch::invoke, ApiRequest, Handler, HandlerError, HandlerResult, Method};
use crate::routing::matcher::split_segments;

struct Entry {
    name: Vec<String>,
    handler: Arc<dyn Handler>,
}

/// Routes API calls to sub-handlers by name.
#[derive(Default)]
pub struct ApiHandler {
    entries: Vec<Entry>,
}

impl ApiHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name` (segments separated by `/`).
    pub fn with_handler(mut self, name: &str, handler: impl Handler + 'static) -> Self {
        self.register(split_segments(name), Arc::new(handler));
        self
    }

    pub fn register(&mut self, name: Vec<String>, handler: Arc<dyn Handler>) {
        tracing::debug!(name = %name.join("/"), "API handler registered");
        self.entries.push(Entry { name, handler });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolve<'c>(&self, context: &'c [String]) -> Option<(&Arc<dyn Handler>, &'c [String])> {
        let mut best: Option<&Entry> = None;
        for entry in &self.entries {
            if context.starts_with(&entry.name)
                && best.map_or(true, |b| entry.name.len() > b.name.len())
            {
                best = Some(entry);
            }
        }
        best.map(|entry| (&entry.handler, &context[entry.name.len()..]))
    }

    fn forward(&self, method: Method, request: &ApiRequest) -> HandlerResult {
        let Some((handler, rest)) = self.resolve(&request.context) else {
            let name = request.context.first().map(String::as_str).unwrap_or_default();
            return Err(HandlerError::not_found(format!("no API handler for '{}'", name)));
        };
        invoke(handler.as_ref(), method, &request.with_context(rest.to_vec()))
    }
}

impl Handler for ApiHandler {
    fn supports(&self, method: Method) -> bool {
        matches!(method, Method::Get | Method::Put | Method::Post | Method::Delete)
    }

    fn get(&self, request: &ApiRequest) -> HandlerResult {
        self.forward(Method::Get, request)
    }

    fn put(&self, request: &ApiRequest) -> HandlerResult {
        self.forward(Method::Put, request)
    }

    fn post(&self, request: &ApiRequest) -> HandlerResult {
        self.forward(Method::Post, request)
    }

    fn delete(&self, request: &ApiRequest) -> HandlerResult {
        self.forward(Method::Delete, request)
    }
}
