//! Error taxonomy for the request lifecycle.
//!
//! # Status Mapping
//! ```text
//! NoRoute            → 404
//! Unauthorized       → 401
//! MethodNotAllowed   → 405
//! Domain(BadRequest) → 400
//! Domain(NotFound)   → 404
//! Domain(Forbidden)  → 403
//! Internal           → 500 (detail logged, never rendered)
//! ```

use axum::http::StatusCode;

use crate::handlers::{HandlerError, Method};

/// Conditions a handler raises on purpose. The message is shown to the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
}

impl DomainError {
    pub fn status(&self) -> StatusCode {
        match self {
            DomainError::BadRequest(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DomainError::BadRequest(m) | DomainError::NotFound(m) | DomainError::Forbidden(m) => m,
        }
    }
}

/// Everything that can stop a request short of a handler payload.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no route matches {0}")]
    NoRoute(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("method not allowed")]
    MethodNotAllowed { allowed: Vec<Method> },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::NoRoute(_) => StatusCode::NOT_FOUND,
            DispatchError::Unauthorized => StatusCode::UNAUTHORIZED,
            DispatchError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::Domain(e) => e.status(),
            DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<HandlerError> for DispatchError {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::Domain(e) => DispatchError::Domain(e),
            HandlerError::MethodNotAllowed { allowed } => DispatchError::MethodNotAllowed { allowed },
            HandlerError::Internal(e) => DispatchError::Internal(e),
        }
    }
}
