//! Metrics collection.
//!
//! # Responsibilities
//! - Define router metrics (cache efficiency, selection outcomes, store latency)
//! - Record through the `metrics` facade; the owning process installs the exporter
//!
//! # Metrics
//! - `router_cache_lookups_total` (counter): lookups by result (hit, miss)
//! - `router_cache_entries` (gauge): cached frontends
//! - `router_backend_selections_total` (counter): selections by outcome
//! - `router_backends_marked_dead_total` (counter): failure feedback applied
//! - `router_store_operation_seconds` (histogram): store latency by op, result
//! - `router_access_log_dropped_total` (counter): log lines dropped on a full queue
//!
//! # Design Decisions
//! - No host label: frontends are unbounded, label cardinality must not be
//! - Recording is a no-op when no recorder is installed

use std::time::Duration;

/// Outcome of a backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Chosen,
    NoBackends,
    AllDead,
    StoreError,
}

impl SelectionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionOutcome::Chosen => "ok",
            SelectionOutcome::NoBackends => "no_backends",
            SelectionOutcome::AllDead => "all_dead",
            SelectionOutcome::StoreError => "store_error",
        }
    }
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("router_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_cache_size(entries: usize) {
    metrics::gauge!("router_cache_entries").set(entries as f64);
}

pub fn record_selection(outcome: SelectionOutcome) {
    metrics::counter!("router_backend_selections_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_backend_marked_dead() {
    metrics::counter!("router_backends_marked_dead_total").increment(1);
}

/// Record the latency of one store call.
pub fn record_store_call(op: &'static str, elapsed: Duration, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::histogram!("router_store_operation_seconds", "op" => op, "result" => result)
        .record(elapsed.as_secs_f64());
}

pub fn record_access_log_dropped() {
    metrics::counter!("router_access_log_dropped_total").increment(1);
}
