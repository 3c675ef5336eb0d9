//! Health feedback subsystem.
//!
//! # Data Flow
//! ```text
//! Request failed (end_request with has_error):
//!     → passive.rs mark_dead → SADD dead:<host> <idx>
//!
//! Backend selection:
//!     SMEMBERS dead:<host> (always live, never cached)
//!     → passive.rs DeadSet::parse → skip dead indices
//! ```
//!
//! # Design Decisions
//! - No active probing: health state arrives only through failure feedback
//! - Dead state lives in the shared store so every proxy process sees it
//! - Reviving a backend is an external/administrative action

pub mod passive;

pub use passive::{mark_dead, DeadSet};
