//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! router dispatch
//!     → logging.rs (structured events: registration, match, halt)
//!     → metrics.rs (request counter, dispatch latency)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape (binary only)
//! ```

pub mod logging;
pub mod metrics;
