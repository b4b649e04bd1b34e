//! Embedded HTTP server core.
//!
//! Prefix routing to registered handlers, per-method dispatch, response
//! encoding and domain-error mapping, served over Axum/Tokio.

pub mod config;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::ServerConfig;
pub use handlers::{ApiHandler, FileHandler, Handler, HandlerError, HandlerResult, Method, Payload};
pub use http::{ApiRequest, DomainError, Server};
pub use lifecycle::{Shutdown, ShutdownSignal};
pub use routing::Route;
