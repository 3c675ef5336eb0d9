//! Administrative operations on routing state.
//!
//! These run outside the request hot path: provisioning frontends, clearing
//! state between test runs, and reviving backends that were marked dead.

use serde::Serialize;

use crate::health::DeadSet;
use crate::routing::FrontendEntry;
use crate::store::{dead_key, frontend_key, RouteStore, StoreError, DEAD_PREFIX, FRONTEND_PREFIX};

/// One backend of a frontend as seen by operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub idx: usize,
    pub url: String,
    pub dead: bool,
}

/// Snapshot of a frontend's routing entry and health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontendStatus {
    pub host: String,
    pub name: String,
    pub backends: Vec<BackendStatus>,
}

impl FrontendStatus {
    pub fn live_count(&self) -> usize {
        self.backends.iter().filter(|b| !b.dead).count()
    }
}

/// Append a frontend entry `[name, backends...]` for `host`.
/// Returns the resulting list length.
pub async fn add_frontend(
    store: &dyn RouteStore,
    host: &str,
    name: &str,
    backends: &[&str],
) -> Result<usize, StoreError> {
    let mut values = Vec::with_capacity(backends.len() + 1);
    values.push(name.to_string());
    values.extend(backends.iter().map(|b| b.to_string()));

    let len = store.list_push(&frontend_key(host), &values).await?;
    tracing::info!(host = %host, name = %name, backends = backends.len(), "Frontend added");
    Ok(len)
}

/// Delete every frontend entry and dead set. Returns the number of keys removed.
pub async fn clear_routes(store: &dyn RouteStore) -> Result<usize, StoreError> {
    let mut keys = store.keys_with_prefix(FRONTEND_PREFIX).await?;
    keys.extend(store.keys_with_prefix(DEAD_PREFIX).await?);
    if keys.is_empty() {
        return Ok(0);
    }

    let deleted = store.delete_keys(&keys).await?;
    tracing::info!(deleted, "Routing state cleared");
    Ok(deleted)
}

/// Remove `backend_idx` from the dead set of `host`.
/// Returns `true` if it was marked dead.
pub async fn revive_backend(
    store: &dyn RouteStore,
    host: &str,
    backend_idx: usize,
) -> Result<bool, StoreError> {
    let revived = store
        .set_remove(&dead_key(host), &backend_idx.to_string())
        .await?;
    if revived {
        tracing::info!(host = %host, backend_idx, "Backend revived");
    }
    Ok(revived)
}

/// Raw dead-set members for `host`, sorted numerically where possible.
pub async fn dead_backends(store: &dyn RouteStore, host: &str) -> Result<Vec<String>, StoreError> {
    let mut members = store.set_members(&dead_key(host)).await?;
    members.sort_by_key(|m| (m.parse::<usize>().unwrap_or(usize::MAX), m.clone()));
    Ok(members)
}

/// Read the current entry and dead set for `host` directly from the store.
pub async fn frontend_status(store: &dyn RouteStore, host: &str) -> Result<FrontendStatus, StoreError> {
    let entry = FrontendEntry::from_sequence(store.list_range(&frontend_key(host)).await?);
    let members = store.set_members(&dead_key(host)).await?;
    let dead = DeadSet::parse(&members, entry.backend_len());

    let backends = entry
        .backends()
        .iter()
        .enumerate()
        .map(|(idx, url)| BackendStatus {
            idx,
            url: url.clone(),
            dead: dead.contains(idx),
        })
        .collect();

    Ok(FrontendStatus {
        host: host.to_string(),
        name: entry.name().to_string(),
        backends,
    })
}
