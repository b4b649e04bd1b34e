//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig (bind_address, port, backlog)
//!     → listener.rs (socket, bind, listen with backlog)
//!     → Hand off to HTTP layer (axum accept loop)
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue (backlog) prevents resource exhaustion
//! - Plain TCP only; TLS is left to a fronting proxy

pub mod listener;

pub use listener::{bind, ListenerError};
