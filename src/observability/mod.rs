//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP surface and translator produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is attached to every request span
//! - Metrics are cheap and safe to record without an installed recorder

pub mod logging;
pub mod metrics;
