//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (route lookup, longest prefix)
//!     → matcher.rs (segment-aligned prefix test, context split)
//!     → Return: matched Route + context, or NoMatch
//!
//! Route registration (at startup):
//!     Vec<Route> in registration order
//!     → reject duplicate / relative prefixes
//!     → freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes fixed at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same path always matches same route

pub mod matcher;
pub mod router;

pub use router::{Route, RouteError, RouteMatch, RouteTable};
