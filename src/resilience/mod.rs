//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Router → routing store call:
//!     → timeouts.rs (enforce per-call deadline)
//!     → On timeout: StoreError::Timeout surfaced to the caller
//! ```
//!
//! # Design Decisions
//! - Every store call has a deadline unless explicitly disabled
//! - No local retries; retry policy belongs to the proxy layer or the store transport

pub mod timeouts;
