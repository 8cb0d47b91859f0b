//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing, cache, dispatch, http produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing
//! - Request ID flows from the HTTP adapter into handler logs
//! - Metrics are cheap (no-ops until a recorder is installed)

pub mod logging;
pub mod metrics;
