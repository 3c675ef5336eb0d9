//! Routing store subsystem.
//!
//! # Data Flow
//! ```text
//! Router (cache miss)        → list_range("frontend:<host>")  → [name, backend_0, backend_1, ...]
//! Router (every selection)   → set_members("dead:<host>")     → {"0", "2", ...}
//! Router (request failed)    → set_add("dead:<host>", idx)
//! Admin tooling              → list_push / set_remove / keys_with_prefix / delete_keys
//! ```
//!
//! # Design Decisions
//! - The store is shared between proxy processes; this crate only talks to it
//!   through the `RouteStore` trait
//! - Multiplexing concurrent calls is the store client's job (pooling etc.)
//! - Dead indices are positional strings, exactly as they sit in the store

pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;

/// Key prefix of the ordered `[name, backend...]` list for a frontend.
pub const FRONTEND_PREFIX: &str = "frontend:";

/// Key prefix of the dead-backend index set for a frontend.
pub const DEAD_PREFIX: &str = "dead:";

/// Store key holding the routing entry for `host`.
pub fn frontend_key(host: &str) -> String {
    format!("{FRONTEND_PREFIX}{host}")
}

/// Store key holding the dead-backend set for `host`.
pub fn dead_key(host: &str) -> String {
    format!("{DEAD_PREFIX}{host}")
}

/// Errors reported by a routing store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The call did not complete before its deadline.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// The key exists but holds a different kind of value.
    #[error("WRONGTYPE operation against key {key} holding the wrong kind of value")]
    WrongType { key: String },

    /// The store could not be reached or the connection broke.
    #[error("store connection error: {0}")]
    Connection(String),
}

/// Client for the shared key-value store holding routing state.
///
/// Semantics follow a Redis-like store: lists are ordered, sets are
/// unordered collections of strings, and reading a missing key yields an
/// empty collection rather than an error.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Read the whole list at `key`.
    async fn list_range(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Append `values` to the list at `key`, returning the new length.
    async fn list_push(&self, key: &str, values: &[String]) -> Result<usize, StoreError>;

    /// Read every member of the set at `key`.
    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Add `member` to the set at `key`. Returns `true` if it was not present.
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// Remove `member` from the set at `key`. Returns `true` if it was present.
    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// List every key starting with `prefix`.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Delete `keys`, returning how many existed.
    async fn delete_keys(&self, keys: &[String]) -> Result<usize, StoreError>;

    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Short name used in logs.
    fn name(&self) -> &str;
}
