//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use async_trait::async_trait;
use route_core::admin;
use route_core::{MemoryStore, RequestData, RouteStore, Router, RouterConfig, StoreError};

/// Store wrapper that can be told to fail or stall specific operation families.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub fail_lists: AtomicBool,
    pub fail_sets: AtomicBool,
    pub fail_ping: AtomicBool,
    pub delay: Option<Duration>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn set_fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::SeqCst);
    }

    async fn check(&self, flag: &AtomicBool) -> Result<(), StoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RouteStore for FaultyStore {
    async fn list_range(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.check(&self.fail_lists).await?;
        self.inner.list_range(key).await
    }

    async fn list_push(&self, key: &str, values: &[String]) -> Result<usize, StoreError> {
        self.inner.list_push(key, values).await
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.check(&self.fail_sets).await?;
        self.inner.set_members(key).await
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        self.check(&self.fail_sets).await?;
        self.inner.set_add(key, member).await
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        self.inner.set_remove(key, member).await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.inner.keys_with_prefix(prefix).await
    }

    async fn delete_keys(&self, keys: &[String]) -> Result<usize, StoreError> {
        self.inner.delete_keys(keys).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check(&self.fail_ping).await
    }

    fn name(&self) -> &str {
        "faulty"
    }
}

/// Fresh memory store and router with default configuration.
pub async fn setup() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::new());
    let router = Router::init(store.clone(), &RouterConfig::default())
        .await
        .unwrap();
    (store, router)
}

/// Store a frontend entry `[name, backends...]` for `host`.
pub async fn add_frontend(store: &dyn RouteStore, host: &str, name: &str, backends: &[&str]) {
    admin::add_frontend(store, host, name, backends).await.unwrap();
}

/// Assert `start_time` was set, then zero it so records can be compared.
pub fn strip_start_time(mut data: RequestData) -> RequestData {
    assert!(data.start_time > UNIX_EPOCH, "start_time should be set");
    data.start_time = UNIX_EPOCH;
    data
}

/// Expected decision record with a zeroed `start_time`.
pub fn expected(host: &str, backend_key: &str, backend: &str, backend_idx: usize, backend_len: usize) -> RequestData {
    RequestData {
        host: host.to_string(),
        backend_key: backend_key.to_string(),
        backend: backend.to_string(),
        backend_idx,
        backend_len,
        start_time: UNIX_EPOCH,
    }
}
