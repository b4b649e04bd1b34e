//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request lifecycle produces:
//!     → logging.rs (structured log events, request ID on every event)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON optional) for machine parsing
//! - Request ID flows through all log events
//! - Metrics are cheap (atomic increments) and off by default

pub mod logging;
pub mod metrics;
