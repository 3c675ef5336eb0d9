//! Backend selection core for a reverse proxy.
//!
//! For every request the proxy layer asks the [`Router`] which upstream
//! backend should serve a frontend host, forwards the request, then reports
//! the outcome back so failed backends are excluded from future selections.
//!
//! ```text
//!   proxy layer ──choose_backend(host)──▶ Router ──▶ LookupCache ──miss──▶ RouteStore (frontend:<host>)
//!                                            │
//!                                            ├──▶ RouteStore (dead:<host>, always live)
//!                                            └──▶ RoundRobin (per-host atomic counter)
//!
//!   proxy layer ──end_request(data, err)──▶ Router ──▶ AccessLogger (optional)
//!                                                 └──▶ RouteStore SADD dead:<host> (on error)
//! ```

// Core subsystems
pub mod config;
pub mod routing;
pub mod store;

// Traffic management
pub mod health;
pub mod load_balancer;

// Cross-cutting concerns
pub mod admin;
pub mod observability;
pub mod resilience;

pub use config::RouterConfig;
pub use observability::{AccessLogger, LogEntry};
pub use routing::{ChooseError, LogEntryFn, RequestData, RouteError, Router};
pub use store::{MemoryStore, RouteStore, StoreError};
