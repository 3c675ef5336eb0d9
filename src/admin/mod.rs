//! Administrative tooling.
//!
//! # Responsibilities
//! - Provision frontends in the routing store
//! - Clear routing and dead-set state
//! - Inspect and revive dead backends
//!
//! # Design Decisions
//! - Operates on the store directly; never part of the request hot path
//! - Routers pick up changes on cache expiry or an explicit purge

pub mod routes;

pub use routes::{
    add_frontend, clear_routes, dead_backends, frontend_status, revive_backend, BackendStatus,
    FrontendStatus,
};
