//! Frontend lookup cache.
//!
//! # Responsibilities
//! - Keep recently used frontend entries in memory to skip store round-trips
//! - Bound memory with least-recently-used eviction
//! - Expire entries after a TTL so store changes propagate
//! - Full purge on demand
//!
//! # Design Decisions
//! - `DashMap` for concurrent access; recency tracked with a logical clock
//!   per entry so reads only take a shard read lock
//! - Eviction scans for the oldest entry; capacities are small (hundreds)
//! - Capacity may be exceeded briefly while concurrent inserts race, never
//!   after they settle
//! - Round-robin state lives elsewhere and is never touched by a purge

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::observability::metrics;
use crate::routing::frontend::FrontendEntry;

#[derive(Debug)]
struct Slot {
    entry: Arc<FrontendEntry>,
    inserted_at: Instant,
    last_used: AtomicU64,
}

/// Bounded, concurrency-safe cache of host → frontend entry.
#[derive(Debug)]
pub struct LookupCache {
    slots: DashMap<String, Slot>,
    capacity: usize,
    ttl: Option<Duration>,
    clock: AtomicU64,
}

impl LookupCache {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    /// `ttl` of `None` disables time-based expiry.
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        Self {
            slots: DashMap::new(),
            capacity: capacity.max(1),
            ttl,
            clock: AtomicU64::new(0),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn is_expired(&self, slot: &Slot) -> bool {
        self.ttl.is_some_and(|ttl| slot.inserted_at.elapsed() >= ttl)
    }

    /// Look up `host`, refreshing its recency on a hit.
    pub fn get(&self, host: &str) -> Option<Arc<FrontendEntry>> {
        let (found, expired) = match self.slots.get(host) {
            Some(slot) if !self.is_expired(&slot) => {
                slot.last_used.store(self.tick(), Ordering::Relaxed);
                (Some(slot.entry.clone()), false)
            }
            Some(_) => (None, true),
            None => (None, false),
        };

        // Shard guard must be released before removing
        if expired {
            self.slots.remove_if(host, |_, slot| self.is_expired(slot));
            tracing::trace!(host = %host, "Cached frontend entry expired");
            metrics::record_cache_size(self.slots.len());
        }
        metrics::record_cache_lookup(found.is_some());
        found
    }

    /// Insert or replace the entry for `host`, evicting the least recently
    /// used entries if the cache is over capacity.
    pub fn set(&self, host: &str, entry: Arc<FrontendEntry>) {
        self.slots.insert(
            host.to_string(),
            Slot {
                entry,
                inserted_at: Instant::now(),
                last_used: AtomicU64::new(self.tick()),
            },
        );

        while self.slots.len() > self.capacity {
            let oldest = self
                .slots
                .iter()
                .min_by_key(|slot| slot.last_used.load(Ordering::Relaxed))
                .map(|slot| slot.key().clone());
            match oldest {
                Some(key) => {
                    self.slots.remove(&key);
                    tracing::trace!(host = %key, "Evicted frontend entry from cache");
                }
                None => break,
            }
        }
        metrics::record_cache_size(self.slots.len());
    }

    /// Drop every cached entry.
    pub fn purge(&self) {
        self.slots.clear();
        metrics::record_cache_size(0);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
