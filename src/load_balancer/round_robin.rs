//! Round-robin load balancing state.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Per-host round-robin counters.
///
/// Counters are created lazily on first use and live for the whole process.
/// `DashMap::entry` makes the first insert race-free, so two concurrent first
/// selections for a new host share one counter and neither increment is lost.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counters: DashMap<String, AtomicU64>,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically advance the counter for `host`, returning its value before
    /// the increment (the first call for a host returns 0).
    pub fn next(&self, host: &str) -> u64 {
        if let Some(counter) = self.counters.get(host) {
            return counter.fetch_add(1, Ordering::Relaxed);
        }
        self.counters
            .entry(host.to_string())
            .or_default()
            .fetch_add(1, Ordering::Relaxed)
    }

    /// Current value of the counter for `host` without advancing it.
    pub fn current(&self, host: &str) -> Option<u64> {
        self.counters
            .get(host)
            .map(|counter| counter.load(Ordering::Relaxed))
    }

    /// Number of hosts with a counter.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

/// Pick the first live index at or after `start % len`, wrapping around.
///
/// Returns `None` when `len` is zero or every index is dead. At most `len`
/// candidates are probed.
pub fn pick_live<F>(start: u64, len: usize, is_dead: F) -> Option<usize>
where
    F: Fn(usize) -> bool,
{
    if len == 0 {
        return None;
    }

    let first = (start % len as u64) as usize;
    (0..len)
        .map(|offset| (first + offset) % len)
        .find(|&idx| !is_dead(idx))
}
