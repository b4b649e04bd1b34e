//! Request handling and transformation.
//!
//! # Responsibilities
//! - Collect the raw request (method, path, query, headers, body)
//! - Parse query strings into an ordered multimap
//! - Build the per-request view handed to handlers
//!
//! # Design Decisions
//! - The body is buffered (size limited) before routing; the core never reads
//!   from the socket
//! - `path` keeps the raw (still percent-encoded) form; routing matches
//!   prefixes on it and decodes the context segments
//! - Repeated query keys keep every value in arrival order

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method as HttpMethod};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

use crate::http::error::DomainError;

/// Header carrying the request ID, set by the request-ID layer.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Raw request handed to the router.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: HttpMethod,
    pub path: String,
    pub query: QueryParams,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Request {
    /// Build a request from a method and a request target (`/path?query`).
    pub fn new(method: HttpMethod, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        Self {
            method,
            path: path.to_string(),
            query: QueryParams::parse(query),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Buffer an incoming axum request, reading at most `max_body_size` bytes.
    pub async fn from_http(
        request: axum::extract::Request,
        max_body_size: usize,
    ) -> Result<Self, axum::Error> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, max_body_size).await?;
        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: QueryParams::parse(parts.uri.query().unwrap_or_default()),
            headers: parts.headers,
            body,
        })
    }

    pub fn request_id(&self) -> &str {
        self.headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Ordered query parameters. A key may appear more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse an `application/x-www-form-urlencoded` query string.
    pub fn parse(query: &str) -> Self {
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// JSON object view: a single value becomes a string, a repeated key an
    /// array of strings.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.pairs {
            match map.get_mut(key) {
                None => {
                    map.insert(key.clone(), serde_json::Value::String(value.clone()));
                }
                Some(serde_json::Value::Array(values)) => {
                    values.push(serde_json::Value::String(value.clone()));
                }
                Some(existing) => {
                    let first = existing.take();
                    *existing = serde_json::Value::Array(vec![
                        first,
                        serde_json::Value::String(value.clone()),
                    ]);
                }
            }
        }
        serde_json::Value::Object(map)
    }
}

impl Serialize for QueryParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Per-request view passed to handlers. Read-only.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    /// Path segments left after the route prefix (and API name) were consumed.
    pub context: Vec<String>,
    pub query_params: QueryParams,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(context: Vec<String>, query_params: QueryParams) -> Self {
        Self {
            context,
            query_params,
            ..Self::default()
        }
    }

    /// Build the handler view of `request` with the given context.
    pub fn from_request(request: &Request, context: Vec<String>) -> Self {
        Self {
            context,
            query_params: request.query.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        }
    }

    /// Same request with a narrower context, used when forwarding to a
    /// sub-handler.
    pub fn with_context(&self, context: Vec<String>) -> Self {
        Self {
            context,
            query_params: self.query_params.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    /// Decode the body as JSON. A malformed body is the client's fault.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, DomainError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| DomainError::BadRequest(format!("invalid JSON body: {}", e)))
    }
}
