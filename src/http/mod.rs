//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, body buffering)
//!     → request.rs (raw request, query parsing, handler view)
//!     → routing + auth + handlers::dispatch
//!     → response.rs (payload / error → status, content-type, body)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::{DispatchError, DomainError};
pub use request::{ApiRequest, QueryParams, Request, X_REQUEST_ID};
pub use response::EncodedResponse;
pub use server::Server;
