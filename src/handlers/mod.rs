//! Request handlers.
//!
//! # Data Flow
//! ```text
//! RouteMatch (handler, context)
//!     → dispatch.rs (capability check, panic boundary)
//!     → Handler::{get, head, put, post, delete}
//!     → Payload | HandlerError
//!     → http::response (encoding)
//! ```
//!
//! # Design Decisions
//! - A handler advertises its capabilities through `supports`; the
//!   dispatcher never calls a method the handler did not advertise
//! - Return values are a closed enum so encoding is an exhaustive match
//! - Handlers are shared across requests and must be `Send + Sync`

pub mod api;
pub mod dispatch;
pub mod file;
pub mod status;

use bytes::Bytes;
use serde::Serialize;
use std::fmt;

use crate::http::error::DomainError;
pub use crate::http::request::{ApiRequest, QueryParams};

pub use api::ApiHandler;
pub use dispatch::{dispatch, invoke};
pub use file::FileHandler;
pub use status::StatusHandler;

/// HTTP methods a handler can expose a capability for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Put,
    Post,
    Delete,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::Head,
        Method::Put,
        Method::Post,
        Method::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }

    /// Map a wire method onto a capability. Methods outside the capability
    /// set (OPTIONS, PATCH, ...) have no mapping.
    pub fn from_http(method: &axum::http::Method) -> Option<Self> {
        match *method {
            axum::http::Method::GET => Some(Method::Get),
            axum::http::Method::HEAD => Some(Method::Head),
            axum::http::Method::PUT => Some(Method::Put),
            axum::http::Method::POST => Some(Method::Post),
            axum::http::Method::DELETE => Some(Method::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value produced by a handler capability.
///
/// Each variant maps to exactly one response shape in `http::response`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No body (204).
    Empty,
    /// Raw bytes served as `application/octet-stream`.
    Bytes(Bytes),
    /// HTML text.
    Text(String),
    /// Structured JSON tree.
    Json(serde_json::Value),
    Integer(i64),
    Float(f64),
    /// File contents with a content type picked by the file handler.
    File {
        content_type: &'static str,
        bytes: Bytes,
    },
}

impl Payload {
    /// Serialize any `Serialize` value into a JSON payload.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, HandlerError> {
        let value = serde_json::to_value(value).map_err(anyhow::Error::from)?;
        Ok(Payload::Json(value))
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for Payload {
    fn from(bytes: &'static [u8]) -> Self {
        Payload::Bytes(Bytes::from_static(bytes))
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Json(value)
    }
}

impl From<i64> for Payload {
    fn from(n: i64) -> Self {
        Payload::Integer(n)
    }
}

impl From<i32> for Payload {
    fn from(n: i32) -> Self {
        Payload::Integer(n.into())
    }
}

impl From<f64> for Payload {
    fn from(n: f64) -> Self {
        Payload::Float(n)
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Payload::Empty)
    }
}

/// Failure raised by a handler capability.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Expected condition rendered to the client with its message.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The handler (or a sub-handler it forwards to) has no capability for
    /// the requested method.
    #[error("method not allowed")]
    MethodNotAllowed { allowed: Vec<Method> },

    /// Anything else. Logged, never rendered.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        HandlerError::Domain(DomainError::BadRequest(message.into()))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HandlerError::Domain(DomainError::NotFound(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        HandlerError::Domain(DomainError::Forbidden(message.into()))
    }
}

pub type HandlerResult = Result<Payload, HandlerError>;

/// A set of per-method capabilities.
///
/// Implementors override `supports` together with the methods they provide.
/// The default method bodies report "method not allowed" so a capability that
/// is advertised but not implemented still fails cleanly.
pub trait Handler: Send + Sync {
    /// Returns true if this handler provides a capability for `method`.
    fn supports(&self, method: Method) -> bool;

    fn get(&self, _request: &ApiRequest) -> HandlerResult {
        Err(self.method_not_allowed())
    }

    fn head(&self, request: &ApiRequest) -> HandlerResult {
        self.get(request)
    }

    fn put(&self, _request: &ApiRequest) -> HandlerResult {
        Err(self.method_not_allowed())
    }

    fn post(&self, _request: &ApiRequest) -> HandlerResult {
        Err(self.method_not_allowed())
    }

    fn delete(&self, _request: &ApiRequest) -> HandlerResult {
        Err(self.method_not_allowed())
    }

    /// Methods this handler accepts. HEAD is implied by GET.
    fn allowed_methods(&self) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|m| self.supports(*m) || (*m == Method::Head && self.supports(Method::Get)))
            .collect()
    }

    fn method_not_allowed(&self) -> HandlerError {
        HandlerError::MethodNotAllowed {
            allowed: self.allowed_methods(),
        }
    }

    /// Invoke the capability for `method` without checking `supports`.
    fn call(&self, method: Method, request: &ApiRequest) -> HandlerResult {
        match method {
            Method::Get => self.get(request),
            Method::Head => self.head(request),
            Method::Put => self.put(request),
            Method::Post => self.post(request),
            Method::Delete => self.delete(request),
        }
    }
}
