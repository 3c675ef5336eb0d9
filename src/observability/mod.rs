//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router produces:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges, histograms)
//!     → access_log.rs (one line per finished request, when configured)
//!
//! Consumers:
//!     → Log aggregation (stdout, file)
//!     → Metrics exporter installed by the owning process
//! ```
//!
//! # Design Decisions
//! - Diagnostic logging (tracing) and the access log are separate streams
//! - Metrics are cheap (atomic increments) and label-bounded
//! - The access log never blocks the request path

pub mod access_log;
pub mod logging;
pub mod metrics;

pub use access_log::{AccessLogger, LogEntry};
