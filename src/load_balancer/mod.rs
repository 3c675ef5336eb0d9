//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Frontend entry resolved (backend_len = n)
//!     → round_robin.rs: RoundRobin::next(host) → counter value c
//!     → pick_live(c, n, is_dead): first live index from c mod n
//!     → Return backend index or None (all dead)
//! ```
//!
//! # Design Decisions
//! - One counter per frontend host, process memory only
//! - Counters are independent of the lookup cache; purges never reset them
//! - Dead backends are skipped, not removed: indices stay positional

pub mod round_robin;

pub use round_robin::{pick_live, RoundRobin};
