//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy layer: choose_backend(host)
//!     → cache.rs (frontend entry, fill from store on miss)
//!     → frontend.rs ([name, backend...] → FrontendEntry)
//!     → store: dead set for host (always live)
//!     → load_balancer: round-robin index, skipping dead
//!     → Return: RequestData or ChooseError { data, kind }
//!
//! Proxy layer: end_request(data, has_error, log_entry)
//!     → access log line (if logger configured and entry supplied)
//!     → health: mark backend dead (if has_error)
//! ```
//!
//! # Design Decisions
//! - Cache purges never disturb round-robin position
//! - Decision record returned on failure too, so callers can account for it
//! - Router is an explicit value passed to request handlers, not a global

pub mod cache;
pub mod error;
pub mod frontend;
pub mod request;
pub mod router;

pub use cache::LookupCache;
pub use error::{ChooseError, RouteError};
pub use frontend::FrontendEntry;
pub use request::RequestData;
pub use router::{LogEntryFn, Router};
