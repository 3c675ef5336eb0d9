//! Backend selection and end-of-request accounting.
//!
//! # Responsibilities
//! - Resolve a frontend host to its backend list (cache, then store)
//! - Pick a live backend round-robin, skipping dead indices
//! - Record request outcome: mark failed backends dead, emit access log
//!
//! # Design Decisions
//! - One `Router` per process, shared by reference (`Arc<Router>`)
//! - The backend list may be served stale from the cache; the dead set is
//!   always read live
//! - "No backends" and "all dead" are distinct errors; both still hand back
//!   the decision record
//! - No local retries: store errors go straight to the caller

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;

use crate::config::RouterConfig;
use crate::health::{self, DeadSet};
use crate::load_balancer::{pick_live, RoundRobin};
use crate::observability::metrics::{self, SelectionOutcome};
use crate::observability::{AccessLogger, LogEntry};
use crate::resilience::timeouts::{deadline_from_millis, with_deadline};
use crate::routing::cache::LookupCache;
use crate::routing::error::{ChooseError, RouteError};
use crate::routing::frontend::FrontendEntry;
use crate::routing::request::RequestData;
use crate::store::{dead_key, frontend_key, RouteStore, StoreError};

/// Produces the access log entry for a finished request. Only invoked when a
/// logger is configured.
pub type LogEntryFn<'a> = &'a (dyn Fn() -> LogEntry + Sync);

/// Backend router shared by all request-handling tasks.
pub struct Router {
    store: Arc<dyn RouteStore>,
    cache: LookupCache,
    round_robin: RoundRobin,
    logger: ArcSwapOption<AccessLogger>,
    store_timeout: Option<Duration>,
}

impl Router {
    /// Build a router with empty round-robin state, an empty cache and no
    /// access logger.
    pub fn new(store: Arc<dyn RouteStore>, config: &RouterConfig) -> Self {
        Self {
            store,
            cache: LookupCache::new(
                config.cache.capacity,
                deadline_from_millis(config.cache.ttl_ms),
            ),
            round_robin: RoundRobin::new(),
            logger: ArcSwapOption::empty(),
            store_timeout: deadline_from_millis(config.store.timeout_ms),
        }
    }

    /// Build a router after checking the store is reachable.
    pub async fn init(store: Arc<dyn RouteStore>, config: &RouterConfig) -> Result<Self, RouteError> {
        let router = Self::new(store, config);
        router
            .store_call("ping", router.store.ping())
            .await
            .map_err(RouteError::Store)?;

        tracing::info!(
            store = router.store.name(),
            cache_capacity = router.cache.capacity(),
            cache_ttl_ms = config.cache.ttl_ms,
            store_timeout_ms = config.store.timeout_ms,
            "Router initialized"
        );
        Ok(router)
    }

    /// Install (or replace) the access logger.
    pub fn set_logger(&self, logger: AccessLogger) {
        self.logger.store(Some(Arc::new(logger)));
    }

    pub fn has_logger(&self) -> bool {
        self.logger.load().is_some()
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    pub fn round_robin(&self) -> &RoundRobin {
        &self.round_robin
    }

    pub fn store(&self) -> &Arc<dyn RouteStore> {
        &self.store
    }

    /// Choose the backend that should serve a request for `host`.
    pub async fn choose_backend(&self, host: &str) -> Result<RequestData, ChooseError> {
        let mut data = RequestData::new(host);

        let entry = match self.frontend(host).await {
            Ok(entry) => entry,
            Err(e) => return Err(self.store_failure(data, e)),
        };

        if !entry.has_backends() {
            metrics::record_selection(SelectionOutcome::NoBackends);
            tracing::debug!(host = %host, "No backends available");
            return Err(ChooseError::new(data, RouteError::NoBackends));
        }

        data.backend_len = entry.backend_len();
        data.backend_key = host.to_string();

        let members = match self
            .store_call("set_members", self.store.set_members(&dead_key(host)))
            .await
        {
            Ok(members) => members,
            Err(e) => return Err(self.store_failure(data, e)),
        };
        let dead = DeadSet::parse(&members, data.backend_len);

        if dead.all_dead(data.backend_len) {
            metrics::record_selection(SelectionOutcome::AllDead);
            tracing::warn!(host = %host, backend_len = data.backend_len, "All backends are dead");
            return Err(ChooseError::new(data, RouteError::AllDead));
        }

        let start = self.round_robin.next(host);
        let Some(idx) = pick_live(start, data.backend_len, |i| dead.contains(i)) else {
            metrics::record_selection(SelectionOutcome::AllDead);
            return Err(ChooseError::new(data, RouteError::AllDead));
        };

        data.backend_idx = idx;
        data.backend = entry.backend(idx).unwrap_or_default().to_string();
        metrics::record_selection(SelectionOutcome::Chosen);
        tracing::debug!(
            host = %host,
            backend = %data.backend,
            backend_idx = idx,
            backend_len = data.backend_len,
            skipped_dead = dead.len(),
            "Backend chosen"
        );
        Ok(data)
    }

    /// Record the outcome of a request previously routed by `choose_backend`.
    ///
    /// The access log line is written first, then on `has_error` the chosen
    /// backend index is added to the host's dead set.
    pub async fn end_request(
        &self,
        data: &RequestData,
        has_error: bool,
        log_entry: Option<LogEntryFn<'_>>,
    ) -> Result<(), RouteError> {
        if let Some(make_entry) = log_entry {
            if let Some(logger) = self.logger.load_full() {
                let mut entry = make_entry();
                if entry.backend_key.is_empty() {
                    entry.backend_key = data.backend_key.clone();
                }
                logger.log(entry);
            }
        }

        if has_error {
            let newly_dead = self
                .store_call(
                    "set_add",
                    health::mark_dead(self.store.as_ref(), &data.host, data.backend_idx),
                )
                .await
                .map_err(|e| {
                    tracing::warn!(
                        host = %data.host,
                        backend_idx = data.backend_idx,
                        error = %e,
                        "Failed to mark backend dead"
                    );
                    RouteError::MarkDead(e)
                })?;

            if newly_dead {
                metrics::record_backend_marked_dead();
                tracing::warn!(
                    host = %data.host,
                    backend = %data.backend,
                    backend_idx = data.backend_idx,
                    "Backend marked dead"
                );
            }
        }
        Ok(())
    }

    /// Flush and close the access logger and drop cached entries.
    /// Safe to call more than once.
    pub async fn stop(&self) {
        if let Some(logger) = self.logger.swap(None) {
            logger.stop().await;
        }
        self.cache.purge();
        tracing::info!("Router stopped");
    }

    async fn frontend(&self, host: &str) -> Result<Arc<FrontendEntry>, StoreError> {
        if let Some(entry) = self.cache.get(host) {
            return Ok(entry);
        }

        let sequence = self
            .store_call("list_range", self.store.list_range(&frontend_key(host)))
            .await?;
        let entry = Arc::new(FrontendEntry::from_sequence(sequence));
        self.cache.set(host, entry.clone());

        tracing::debug!(
            host = %host,
            name = %entry.name(),
            backend_len = entry.backend_len(),
            "Frontend entry cached"
        );
        Ok(entry)
    }

    async fn store_call<T, F>(&self, op: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let started = Instant::now();
        let result = with_deadline(self.store_timeout, fut).await;
        metrics::record_store_call(op, started.elapsed(), result.is_ok());
        result
    }

    fn store_failure(&self, data: RequestData, error: StoreError) -> ChooseError {
        metrics::record_selection(SelectionOutcome::StoreError);
        tracing::warn!(
            host = %data.host,
            store = self.store.name(),
            error = %error,
            "Routing store lookup failed"
        );
        ChooseError::new(data, RouteError::Store(error))
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("store", &self.store.name())
            .field("cache", &self.cache)
            .field("round_robin", &self.round_robin)
            .field("has_logger", &self.has_logger())
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}
