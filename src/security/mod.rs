//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → request ID / size limits (tower layers)
//!     → routing (match prefix)
//!     → auth.rs (global credential check)
//!     → Pass to dispatch
//! ```
//!
//! # Design Decisions
//! - Fail closed: a malformed credential is the same as none
//! - One gate for all routes, no per-route policy

pub mod auth;

pub use auth::{AuthDecision, AuthGate};
