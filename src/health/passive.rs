//! Passive health checking (failure feedback).
//!
//! # Responsibilities
//! - Interpret the dead-backend set read from the routing store
//! - Record a failed backend in the dead set
//!
//! # Design Decisions
//! - Indices are positional strings; members that do not parse or point past
//!   the current backend list are stale and ignored
//! - "All dead" means every index in `0..backend_len` is dead, so a stale
//!   member can never make a frontend with a live backend unroutable

use std::collections::HashSet;

use crate::store::{dead_key, RouteStore, StoreError};

/// Dead backend indices for one frontend, filtered against its backend count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadSet {
    indices: HashSet<usize>,
}

impl DeadSet {
    /// Parse raw set members, keeping indices below `backend_len`.
    pub fn parse<S: AsRef<str>>(members: &[S], backend_len: usize) -> Self {
        let mut indices = HashSet::with_capacity(members.len());
        for member in members {
            let member = member.as_ref();
            match member.parse::<usize>() {
                Ok(idx) if idx < backend_len => {
                    indices.insert(idx);
                }
                _ => {
                    tracing::debug!(member = %member, backend_len, "Ignoring stale dead backend index");
                }
            }
        }
        Self { indices }
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.indices.contains(&idx)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True when no backend out of `backend_len` is live.
    pub fn all_dead(&self, backend_len: usize) -> bool {
        self.indices.len() >= backend_len
    }
}

/// Add `backend_idx` to the dead set of `host`.
/// Returns `true` if the backend was not already marked.
pub async fn mark_dead(
    store: &dyn RouteStore,
    host: &str,
    backend_idx: usize,
) -> Result<bool, StoreError> {
    store.set_add(&dead_key(host), &backend_idx.to_string()).await
}
